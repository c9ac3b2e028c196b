//! Custom-property application onto a scoping root.
//!
//! # Design
//! - `StyleRoot` is the seam to the host (a DOM element, a headless renderer, a test
//!   double); the applier only ever talks to it through property writes.
//! - The applier remembers what it wrote and diffs against it: unchanged values are not
//!   rewritten and properties absent from the new target are removed.
//! - Targets are always the base theme overlaid with the visible theme, so clearing a
//!   brand restores base values exactly.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tessera_tokens::{MODE_ATTRIBUTE, ThemeMode};

use crate::resolved::ResolvedTheme;

/// Host element receiving custom properties and the mode attribute.
pub trait StyleRoot: Send {
    /// Set a custom property.
    fn set_property(&mut self, name: &str, value: &str);
    /// Remove a custom property.
    fn remove_property(&mut self, name: &str);
    /// Set the mode attribute (`data-theme`).
    fn set_mode(&mut self, mode: ThemeMode);
}

#[derive(Debug, Default)]
struct InMemoryState {
    properties: BTreeMap<String, String>,
    mode: Option<ThemeMode>,
    writes: usize,
    removals: usize,
}

/// Style root kept in memory; clones share state so tests and previews can observe it.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStyleRoot {
    inner: Arc<Mutex<InMemoryState>>,
}

impl InMemoryStyleRoot {
    /// Create an empty root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut InMemoryState) -> T) -> T {
        let mut state = self.inner.lock().expect("style root mutex poisoned");
        f(&mut state)
    }

    /// Properties currently set.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn properties(&self) -> BTreeMap<String, String> {
        self.with_state(|state| state.properties.clone())
    }

    /// Value of a single property.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<String> {
        self.with_state(|state| state.properties.get(name).cloned())
    }

    /// Mode attribute, if set.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn mode(&self) -> Option<ThemeMode> {
        self.with_state(|state| state.mode)
    }

    /// Number of property writes received.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.with_state(|state| state.writes)
    }

    /// Number of property removals received.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn removal_count(&self) -> usize {
        self.with_state(|state| state.removals)
    }

    /// Render the root as an element's attribute and inline style.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn to_inline_style(&self) -> String {
        self.with_state(|state| {
            let style = state
                .properties
                .iter()
                .map(|(name, value)| format!("{name}: {value};"))
                .collect::<Vec<_>>()
                .join(" ");
            state.mode.map_or_else(
                || format!("style=\"{style}\""),
                |mode| format!("{MODE_ATTRIBUTE}=\"{mode}\" style=\"{style}\""),
            )
        })
    }
}

impl StyleRoot for InMemoryStyleRoot {
    fn set_property(&mut self, name: &str, value: &str) {
        self.with_state(|state| {
            state.properties.insert(name.to_string(), value.to_string());
            state.writes += 1;
        });
    }

    fn remove_property(&mut self, name: &str) {
        self.with_state(|state| {
            if state.properties.remove(name).is_some() {
                state.removals += 1;
            }
        });
    }

    fn set_mode(&mut self, mode: ThemeMode) {
        self.with_state(|state| state.mode = Some(mode));
    }
}

/// Counts of root mutations performed by one application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplySummary {
    /// Properties written.
    pub written: usize,
    /// Properties removed.
    pub removed: usize,
}

/// Diffing writer that owns the scoping root.
pub struct StyleApplier {
    root: Box<dyn StyleRoot>,
    base: Arc<ResolvedTheme>,
    applied: BTreeMap<String, String>,
    mode: Option<ThemeMode>,
}

impl StyleApplier {
    /// Wrap `root`; nothing is written until the first apply.
    #[must_use]
    pub fn new(root: Box<dyn StyleRoot>, base: Arc<ResolvedTheme>) -> Self {
        Self {
            root,
            base,
            applied: BTreeMap::new(),
            mode: None,
        }
    }

    /// Apply base values overlaid with `theme` (base alone when `None`) for `mode`.
    pub fn apply(&mut self, theme: Option<&ResolvedTheme>, mode: ThemeMode) -> ApplySummary {
        let mut target = self.base.properties(mode);
        if let Some(theme) = theme {
            target.extend(theme.properties(mode));
        }

        let stale: Vec<String> = self
            .applied
            .keys()
            .filter(|name| !target.contains_key(*name))
            .cloned()
            .collect();
        for name in &stale {
            self.root.remove_property(name);
            self.applied.remove(name);
        }

        let written = self.write_changed(target);
        self.set_mode(mode);
        ApplySummary {
            written,
            removed: stale.len(),
        }
    }

    /// Rewrite only mode-dependent properties of `theme` (base when `None`) for `mode`.
    pub fn apply_mode(&mut self, theme: Option<&ResolvedTheme>, mode: ThemeMode) -> ApplySummary {
        let mut target = self.base.mode_properties(mode);
        if let Some(theme) = theme {
            target.extend(theme.mode_properties(mode));
        }
        let written = self.write_changed(target);
        self.set_mode(mode);
        ApplySummary {
            written,
            removed: 0,
        }
    }

    /// Properties as last written.
    #[must_use]
    pub const fn applied(&self) -> &BTreeMap<String, String> {
        &self.applied
    }

    /// Mode attribute as last written.
    #[must_use]
    pub const fn mode(&self) -> Option<ThemeMode> {
        self.mode
    }

    /// Base theme this applier falls back to.
    #[must_use]
    pub fn base(&self) -> &ResolvedTheme {
        &self.base
    }

    fn write_changed(&mut self, target: BTreeMap<String, String>) -> usize {
        let mut written = 0;
        for (name, value) in target {
            if self.applied.get(&name) == Some(&value) {
                continue;
            }
            self.root.set_property(&name, &value);
            self.applied.insert(name, value);
            written += 1;
        }
        written
    }

    fn set_mode(&mut self, mode: ThemeMode) {
        if self.mode != Some(mode) {
            self.root.set_mode(mode);
            self.mode = Some(mode);
        }
    }
}
