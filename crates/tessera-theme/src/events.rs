//! Theme change notifications.
//!
//! Built on `tokio::broadcast`; slow subscribers lag and lose the oldest events rather
//! than stalling the manager.

use serde::{Deserialize, Serialize};
use tessera_tokens::ThemeMode;
use tokio::sync::broadcast;

/// Something visible changed on the scoping root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ThemeEvent {
    /// Base styling was applied for the first time.
    BaseApplied {
        /// Mode in effect.
        mode: ThemeMode,
    },
    /// A brand theme became visible.
    BrandApplied {
        /// Brand now visible.
        brand_id: String,
        /// Mode in effect.
        mode: ThemeMode,
    },
    /// The brand overlay was removed and base styling restored.
    BrandCleared {
        /// Mode in effect.
        mode: ThemeMode,
    },
    /// The light/dark mode changed.
    ModeChanged {
        /// New mode.
        mode: ThemeMode,
    },
    /// The selected brand could not be loaded; base styling is in effect.
    BrandFailed {
        /// Brand that failed.
        brand_id: String,
        /// Whether the failure came from the cache.
        cached: bool,
    },
}

impl ThemeEvent {
    /// Machine-friendly discriminator.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BaseApplied { .. } => "base_applied",
            Self::BrandApplied { .. } => "brand_applied",
            Self::BrandCleared { .. } => "brand_cleared",
            Self::ModeChanged { .. } => "mode_changed",
            Self::BrandFailed { .. } => "brand_failed",
        }
    }
}

/// Broadcast channel for [`ThemeEvent`]s.
#[derive(Clone, Debug)]
pub struct ThemeEventBus {
    sender: broadcast::Sender<ThemeEvent>,
}

impl ThemeEventBus {
    /// Bus retaining up to `capacity` undelivered events per subscriber.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "theme event capacity must be positive");
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish `event`; having no subscribers is not an error.
    pub fn publish(&self, event: ThemeEvent) {
        let _ = self.sender.send(event);
    }

    /// Receive events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ThemeEvent> {
        self.sender.subscribe()
    }
}
