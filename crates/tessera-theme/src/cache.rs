//! Per-brand cache of resolved themes, in-flight loads, and failures.
//!
//! # Design
//! - Entries live for the lifetime of the cache; nothing expires on its own.
//!   `evict` exists for long-lived hosts and leaves in-flight loads alone.
//! - An in-flight entry holds a `watch` receiver so every caller for the same brand
//!   observes the one shared fetch.
//! - Failures are cached as a permanent sentinel; there are no retries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::brand::BrandId;
use crate::error::FetchError;
use crate::resolved::ResolvedTheme;
use crate::validate::ValidationWarning;

/// A validated brand theme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedBrand {
    /// Brand the theme belongs to.
    pub brand_id: BrandId,
    /// Fallback-complete theme.
    pub theme: Arc<ResolvedTheme>,
    /// Warnings produced while validating the payload.
    pub warnings: Vec<ValidationWarning>,
}

/// Result of one brand load, shared with every waiter.
pub(crate) type LoadOutcome = Result<Arc<ResolvedBrand>, Arc<FetchError>>;

/// Receiver half observed by waiters of an in-flight load.
pub(crate) type LoadReceiver = watch::Receiver<Option<LoadOutcome>>;

/// Sender half owned by the task performing a load.
pub(crate) type LoadSender = watch::Sender<Option<LoadOutcome>>;

enum CacheEntry {
    Resolved(Arc<ResolvedBrand>),
    Loading(LoadReceiver),
    Failed(Arc<FetchError>),
}

/// Observable state of a cache entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheState {
    /// A resolved theme is cached.
    Resolved,
    /// A load is in flight.
    Loading,
    /// The brand failed to load; the failure is permanent.
    Failed,
}

/// What a lookup found, reserving the entry on a miss.
pub(crate) enum Lookup {
    Hit(Arc<ResolvedBrand>),
    Failed(Arc<FetchError>),
    Waiting(LoadReceiver),
    Started(LoadSender, LoadReceiver),
}

/// Shared handle to the brand cache.
#[derive(Clone, Default)]
pub struct ThemeCache {
    entries: Arc<Mutex<HashMap<BrandId, CacheEntry>>>,
}

impl ThemeCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<T>(&self, f: impl FnOnce(&mut HashMap<BrandId, CacheEntry>) -> T) -> T {
        let mut entries = self.entries.lock().expect("theme cache mutex poisoned");
        f(&mut entries)
    }

    /// State of the entry for `brand_id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn state(&self, brand_id: &BrandId) -> Option<CacheState> {
        self.with_entries(|entries| {
            entries.get(brand_id).map(|entry| match entry {
                CacheEntry::Resolved(_) => CacheState::Resolved,
                CacheEntry::Loading(_) => CacheState::Loading,
                CacheEntry::Failed(_) => CacheState::Failed,
            })
        })
    }

    /// Cached theme for `brand_id`, if resolved.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn resolved(&self, brand_id: &BrandId) -> Option<Arc<ResolvedBrand>> {
        self.with_entries(|entries| match entries.get(brand_id) {
            Some(CacheEntry::Resolved(brand)) => Some(Arc::clone(brand)),
            _ => None,
        })
    }

    /// Drop a settled entry so the next load fetches again.
    ///
    /// Returns `false` when nothing was evicted, including when a load is in flight.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn evict(&self, brand_id: &BrandId) -> bool {
        self.with_entries(|entries| match entries.get(brand_id) {
            Some(CacheEntry::Resolved(_) | CacheEntry::Failed(_)) => {
                entries.remove(brand_id);
                true
            }
            Some(CacheEntry::Loading(_)) | None => false,
        })
    }

    /// Number of entries, in flight or settled.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.with_entries(|entries| entries.len())
    }

    /// Whether the cache holds no entries.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up `brand_id`, registering an in-flight entry on a miss.
    pub(crate) fn lookup_or_begin(&self, brand_id: &BrandId) -> Lookup {
        self.with_entries(|entries| match entries.get(brand_id) {
            Some(CacheEntry::Resolved(brand)) => Lookup::Hit(Arc::clone(brand)),
            Some(CacheEntry::Failed(error)) => Lookup::Failed(Arc::clone(error)),
            Some(CacheEntry::Loading(receiver)) => Lookup::Waiting(receiver.clone()),
            None => {
                let (sender, receiver) = watch::channel(None);
                entries.insert(brand_id.clone(), CacheEntry::Loading(receiver.clone()));
                Lookup::Started(sender, receiver)
            }
        })
    }

    /// Record `error` for `brand_id` if its load is still marked in flight.
    pub(crate) fn fail_in_flight(&self, brand_id: &BrandId, error: &Arc<FetchError>) {
        self.with_entries(|entries| {
            if let Some(entry @ CacheEntry::Loading(_)) = entries.get_mut(brand_id) {
                *entry = CacheEntry::Failed(Arc::clone(error));
            }
        });
    }

    /// Settle the entry for `brand_id` with the outcome of its load.
    pub(crate) fn complete(&self, brand_id: &BrandId, outcome: &LoadOutcome) {
        let entry = match outcome {
            Ok(brand) => CacheEntry::Resolved(Arc::clone(brand)),
            Err(error) => CacheEntry::Failed(Arc::clone(error)),
        };
        self.with_entries(|entries| {
            entries.insert(brand_id.clone(), entry);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brand(id: &BrandId) -> Arc<ResolvedBrand> {
        Arc::new(ResolvedBrand {
            brand_id: id.clone(),
            theme: Arc::new(ResolvedTheme::default()),
            warnings: Vec::new(),
        })
    }

    #[test]
    fn miss_registers_in_flight_entry_once() -> Result<(), Box<dyn std::error::Error>> {
        let cache = ThemeCache::new();
        let id = BrandId::parse("acme")?;
        assert!(matches!(cache.lookup_or_begin(&id), Lookup::Started(..)));
        assert!(matches!(cache.lookup_or_begin(&id), Lookup::Waiting(_)));
        assert_eq!(cache.state(&id), Some(CacheState::Loading));
        assert!(!cache.evict(&id), "in-flight entries are not evicted");
        Ok(())
    }

    #[test]
    fn settled_entries_can_be_evicted() -> Result<(), Box<dyn std::error::Error>> {
        let cache = ThemeCache::new();
        let id = BrandId::parse("acme")?;
        let _ = cache.lookup_or_begin(&id);
        cache.complete(&id, &Ok(brand(&id)));
        assert_eq!(cache.state(&id), Some(CacheState::Resolved));
        assert!(cache.resolved(&id).is_some());

        assert!(cache.evict(&id));
        assert!(cache.is_empty());
        assert!(!cache.evict(&id));
        Ok(())
    }

    #[test]
    fn failures_are_sticky() -> Result<(), Box<dyn std::error::Error>> {
        let cache = ThemeCache::new();
        let id = BrandId::parse("acme")?;
        let failure = Arc::new(FetchError::Status {
            url: "https://cdn.example/app/themes/acme.json".into(),
            status: 500,
        });
        cache.complete(&id, &Err(failure));
        assert!(matches!(cache.lookup_or_begin(&id), Lookup::Failed(_)));
        assert_eq!(cache.state(&id), Some(CacheState::Failed));
        Ok(())
    }

    #[test]
    fn abandoned_load_becomes_failure() -> Result<(), Box<dyn std::error::Error>> {
        let cache = ThemeCache::new();
        let id = BrandId::parse("acme")?;
        let other = BrandId::parse("globex")?;
        let _ = cache.lookup_or_begin(&id);
        cache.complete(&other, &Ok(brand(&other)));

        let abandoned = Arc::new(FetchError::Abandoned {
            brand_id: "acme".into(),
        });
        cache.fail_in_flight(&id, &abandoned);
        cache.fail_in_flight(&other, &abandoned);

        assert_eq!(cache.state(&id), Some(CacheState::Failed));
        assert_eq!(cache.state(&other), Some(CacheState::Resolved));
        assert!(cache.evict(&id));
        Ok(())
    }
}
