//! Runtime theme manager.
//!
//! # Design
//! - One mutex guards phase, mode, selection, and the style applier, so every visible
//!   transition (apply, revert, mode swap) happens atomically with its bookkeeping.
//! - The selection is the last brand asked for. A load only becomes visible if its
//!   brand is still selected when it finishes; otherwise it is cached and discarded.
//! - Loads for the same brand share one spawned fetch through the cache's watch channel,
//!   even across managers sharing a cache. Every manager waiting on a load settles the
//!   outcome against its own state.
//! - A loading task that ends without an outcome records an `Abandoned` failure, so the
//!   cache and the root never stay in `Loading`.
//! - The currently visible brand stays on the root until its replacement is ready.
//! - A failed brand reverts the root to base styling and is remembered; later loads of
//!   it fail immediately without fetching.
//! - Using the manager before `init_base_theme` is a programming error and panics.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tessera_tokens::{BrandThemeSchema, ThemeMode};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::apply::{StyleApplier, StyleRoot};
use crate::brand::BrandId;
use crate::cache::{LoadOutcome, LoadReceiver, LoadSender, Lookup, ResolvedBrand, ThemeCache};
use crate::config::{DEFAULT_EVENT_CAPACITY, DEFAULT_FETCH_TIMEOUT, ThemeConfig};
use crate::error::{FetchError, ThemeError, ThemeResult};
use crate::events::{ThemeEvent, ThemeEventBus};
use crate::fetch::BrandFetcher;
use crate::preference::{FixedModePreference, ModePreference};
use crate::resolved::ResolvedTheme;
use crate::validate::{ValidationWarning, validate};

const NOT_INITIALISED: &str = "ThemeManager used before init_base_theme";

/// Collaborators and settings used to build a [`ThemeManager`].
pub struct ManagerDependencies {
    /// Compiled schema describing every token.
    pub schema: Arc<BrandThemeSchema>,
    /// Source of brand payloads.
    pub fetcher: Arc<dyn BrandFetcher>,
    /// Scoping root receiving custom properties.
    pub root: Box<dyn StyleRoot>,
    /// Stored mode preference, read once at initialisation.
    pub preference: Arc<dyn ModePreference>,
    /// Brand cache; share one between managers to share resolved brands.
    pub cache: ThemeCache,
    /// Upper bound on a single payload fetch.
    pub fetch_timeout: Duration,
    /// Mode used when the preference has no answer.
    pub default_mode: ThemeMode,
    /// Capacity of the event channel.
    pub event_capacity: usize,
}

impl ManagerDependencies {
    /// Dependencies with default settings and no stored preference.
    #[must_use]
    pub fn new(
        schema: Arc<BrandThemeSchema>,
        fetcher: Arc<dyn BrandFetcher>,
        root: Box<dyn StyleRoot>,
    ) -> Self {
        Self {
            schema,
            fetcher,
            root,
            preference: Arc::new(FixedModePreference(None)),
            cache: ThemeCache::new(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            default_mode: ThemeMode::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Take timeout, default mode, and event capacity from `config`.
    #[must_use]
    pub const fn with_config(mut self, config: &ThemeConfig) -> Self {
        self.fetch_timeout = config.fetch_timeout;
        self.default_mode = config.default_mode;
        self.event_capacity = config.event_capacity;
        self
    }

    /// Use `preference` for the initial mode.
    #[must_use]
    pub fn with_preference(mut self, preference: impl ModePreference + 'static) -> Self {
        self.preference = Arc::new(preference);
        self
    }

    /// Use an existing cache.
    #[must_use]
    pub fn with_cache(mut self, cache: ThemeCache) -> Self {
        self.cache = cache;
        self
    }

    /// Override the fetch timeout.
    #[must_use]
    pub const fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

/// Lifecycle of the scoping root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ThemePhase {
    /// Nothing has been applied yet.
    Uninitialized,
    /// Base styling is in effect and no brand is pending.
    BaseApplied,
    /// A brand is selected and its load is in flight.
    Loading(BrandId),
    /// A brand theme is visible.
    BrandApplied(BrandId),
}

/// Whether a finished load is the one on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    /// The brand is selected and visible.
    Applied,
    /// Another brand was selected (or the brand cleared) before this load finished.
    Superseded,
}

/// Where the resolved theme came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadSource {
    /// Served from the cache without fetching.
    Cache,
    /// This call started the fetch.
    Fetched,
    /// This call joined a fetch already in flight.
    Joined,
}

/// Result of a successful brand load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrandLoad {
    /// Brand that was loaded.
    pub brand_id: BrandId,
    /// Whether the brand is visible.
    pub status: LoadStatus,
    /// Where the theme came from.
    pub source: LoadSource,
    /// Validation warnings for the payload.
    pub warnings: Vec<ValidationWarning>,
}

struct ManagerState {
    phase: ThemePhase,
    mode: ThemeMode,
    selection: Option<BrandId>,
    visible: Option<Arc<ResolvedBrand>>,
    applier: StyleApplier,
}

struct ManagerInner {
    schema: Arc<BrandThemeSchema>,
    base: Arc<ResolvedTheme>,
    fetcher: Arc<dyn BrandFetcher>,
    preference: Arc<dyn ModePreference>,
    cache: ThemeCache,
    fetch_timeout: Duration,
    default_mode: ThemeMode,
    events: ThemeEventBus,
    state: Mutex<ManagerState>,
}

enum Pending {
    Ready(Arc<ResolvedBrand>),
    Join(LoadReceiver, LoadSource),
}

/// Owns the scoping root and drives base, brand, and mode changes onto it.
#[derive(Clone)]
pub struct ThemeManager {
    inner: Arc<ManagerInner>,
}

impl ThemeManager {
    /// Build a manager; nothing touches the root until [`Self::init_base_theme`].
    ///
    /// # Panics
    ///
    /// Panics if `event_capacity` is zero.
    #[must_use]
    pub fn new(deps: ManagerDependencies) -> Self {
        let base = Arc::new(ResolvedTheme::from_fallbacks(&deps.schema));
        let applier = StyleApplier::new(deps.root, Arc::clone(&base));
        let state = ManagerState {
            phase: ThemePhase::Uninitialized,
            mode: deps.default_mode,
            selection: None,
            visible: None,
            applier,
        };
        Self {
            inner: Arc::new(ManagerInner {
                schema: deps.schema,
                base,
                fetcher: deps.fetcher,
                preference: deps.preference,
                cache: deps.cache,
                fetch_timeout: deps.fetch_timeout,
                default_mode: deps.default_mode,
                events: ThemeEventBus::new(deps.event_capacity),
                state: Mutex::new(state),
            }),
        }
    }

    /// Apply base styling in the preferred mode. Later calls do nothing.
    ///
    /// # Panics
    ///
    /// Panics if the state mutex is poisoned.
    pub fn init_base_theme(&self) {
        let mut state = self.inner.lock_state();
        if state.phase != ThemePhase::Uninitialized {
            debug!("base theme already applied");
            return;
        }
        let mode = self.inner.preference.read().unwrap_or(self.inner.default_mode);
        state.mode = mode;
        let summary = state.applier.apply(None, mode);
        state.phase = ThemePhase::BaseApplied;
        drop(state);
        info!(mode = %mode, written = summary.written, "base theme applied");
        self.inner.events.publish(ThemeEvent::BaseApplied { mode });
    }

    /// Select `brand_id` and make its theme visible once resolved.
    ///
    /// # Errors
    ///
    /// - [`ThemeError::InvalidBrandId`] if the identifier is rejected; nothing changes.
    /// - [`ThemeError::BrandUnavailable`] if the payload cannot be obtained, now or in
    ///   an earlier attempt, or the loading task ended early; base styling is applied if
    ///   the brand was still selected.
    ///
    /// # Panics
    ///
    /// Panics if called before [`Self::init_base_theme`].
    pub async fn load_brand(&self, brand_id: &str) -> ThemeResult<BrandLoad> {
        let (brand_id, pending) = self.begin(brand_id)?;
        let (outcome, source) = match pending {
            Pending::Ready(brand) => return Ok(self.report(&brand, LoadSource::Cache)),
            Pending::Join(receiver, source) => {
                (self.inner.await_outcome(&brand_id, receiver).await, source)
            }
        };
        self.inner.settle(&brand_id, &outcome);

        match outcome {
            Ok(brand) => Ok(self.report(&brand, source)),
            Err(source) => Err(ThemeError::BrandUnavailable {
                brand_id,
                cached: false,
                source,
            }),
        }
    }

    /// Switch light/dark, rewriting only mode-dependent properties.
    ///
    /// # Panics
    ///
    /// Panics if called before [`Self::init_base_theme`].
    pub fn set_mode(&self, mode: ThemeMode) {
        let mut state = self.inner.lock_initialised();
        if state.mode == mode {
            return;
        }
        state.mode = mode;
        let visible = state.visible.clone();
        let summary = state
            .applier
            .apply_mode(visible.as_ref().map(|brand| brand.theme.as_ref()), mode);
        drop(state);
        debug!(mode = %mode, written = summary.written, "theme mode changed");
        self.inner.events.publish(ThemeEvent::ModeChanged { mode });
    }

    /// Flip between light and dark, returning the new mode.
    ///
    /// # Panics
    ///
    /// Panics if called before [`Self::init_base_theme`].
    #[must_use]
    pub fn toggle_mode(&self) -> ThemeMode {
        let mode = self.mode().toggle();
        self.set_mode(mode);
        mode
    }

    /// Drop the brand selection and restore base styling.
    ///
    /// Returns `false` when no brand was selected or visible.
    ///
    /// # Panics
    ///
    /// Panics if called before [`Self::init_base_theme`].
    #[must_use]
    pub fn clear_brand(&self) -> bool {
        let mut state = self.inner.lock_initialised();
        let had_selection = state.selection.take().is_some();
        let had_visible = state.visible.take().is_some();
        let mode = state.mode;
        state.applier.apply(None, mode);
        state.phase = ThemePhase::BaseApplied;
        drop(state);
        let cleared = had_selection || had_visible;
        if cleared {
            info!(mode = %mode, "brand theme cleared");
            self.inner.events.publish(ThemeEvent::BrandCleared { mode });
        }
        cleared
    }

    /// Current lifecycle phase.
    ///
    /// # Panics
    ///
    /// Panics if the state mutex is poisoned.
    #[must_use]
    pub fn phase(&self) -> ThemePhase {
        self.inner.lock_state().phase.clone()
    }

    /// Mode in effect (or to be used at initialisation).
    ///
    /// # Panics
    ///
    /// Panics if the state mutex is poisoned.
    #[must_use]
    pub fn mode(&self) -> ThemeMode {
        self.inner.lock_state().mode
    }

    /// Brand most recently asked for, if any.
    ///
    /// # Panics
    ///
    /// Panics if the state mutex is poisoned.
    #[must_use]
    pub fn selected_brand(&self) -> Option<BrandId> {
        self.inner.lock_state().selection.clone()
    }

    /// Brand currently on the root, if any.
    ///
    /// # Panics
    ///
    /// Panics if the state mutex is poisoned.
    #[must_use]
    pub fn visible_brand(&self) -> Option<Arc<ResolvedBrand>> {
        self.inner.lock_state().visible.clone()
    }

    /// Properties as last written to the root.
    ///
    /// # Panics
    ///
    /// Panics if the state mutex is poisoned.
    #[must_use]
    pub fn applied_properties(&self) -> BTreeMap<String, String> {
        self.inner.lock_state().applier.applied().clone()
    }

    /// Receive theme events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ThemeEvent> {
        self.inner.events.subscribe()
    }

    /// Brand cache backing this manager.
    #[must_use]
    pub fn cache(&self) -> &ThemeCache {
        &self.inner.cache
    }

    /// Schema payloads are validated against.
    #[must_use]
    pub fn schema(&self) -> &BrandThemeSchema {
        &self.inner.schema
    }

    /// Fallback-only theme applied when no brand is visible.
    #[must_use]
    pub fn base_theme(&self) -> &ResolvedTheme {
        &self.inner.base
    }

    fn begin(&self, raw: &str) -> ThemeResult<(BrandId, Pending)> {
        let mut state = self.inner.lock_initialised();
        let brand_id = BrandId::parse(raw)?;
        state.selection = Some(brand_id.clone());

        let pending = match self.inner.cache.lookup_or_begin(&brand_id) {
            Lookup::Hit(brand) => {
                debug!(brand_id = %brand_id, "brand theme served from cache");
                self.inner.show(&mut state, Arc::clone(&brand));
                Pending::Ready(brand)
            }
            Lookup::Failed(source) => {
                self.inner.revert_to_base(&mut state, &brand_id, true);
                return Err(ThemeError::BrandUnavailable {
                    brand_id,
                    cached: true,
                    source,
                });
            }
            Lookup::Waiting(receiver) => {
                state.phase = ThemePhase::Loading(brand_id.clone());
                tokio::spawn(follow_load(
                    Arc::clone(&self.inner),
                    brand_id.clone(),
                    receiver.clone(),
                ));
                Pending::Join(receiver, LoadSource::Joined)
            }
            Lookup::Started(sender, receiver) => {
                state.phase = ThemePhase::Loading(brand_id.clone());
                tokio::spawn(run_load(LoadTask {
                    inner: Arc::clone(&self.inner),
                    brand_id: brand_id.clone(),
                    sender: Some(sender),
                }));
                Pending::Join(receiver, LoadSource::Fetched)
            }
        };
        drop(state);
        Ok((brand_id, pending))
    }

    fn report(&self, brand: &ResolvedBrand, source: LoadSource) -> BrandLoad {
        let state = self.inner.lock_state();
        let selected = state.selection.as_ref() == Some(&brand.brand_id);
        let visible = state
            .visible
            .as_ref()
            .is_some_and(|visible| visible.brand_id == brand.brand_id);
        drop(state);
        BrandLoad {
            brand_id: brand.brand_id.clone(),
            status: if selected && visible {
                LoadStatus::Applied
            } else {
                LoadStatus::Superseded
            },
            source,
            warnings: brand.warnings.clone(),
        }
    }
}

impl ManagerInner {
    fn lock_state(&self) -> MutexGuard<'_, ManagerState> {
        self.state.lock().expect("theme state mutex poisoned")
    }

    fn lock_initialised(&self) -> MutexGuard<'_, ManagerState> {
        let state = self.lock_state();
        assert!(state.phase != ThemePhase::Uninitialized, "{NOT_INITIALISED}");
        state
    }

    async fn resolve(&self, brand_id: &BrandId) -> LoadOutcome {
        let payload = tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch(brand_id))
            .await
            .map_err(|_| FetchError::TimedOut {
                brand_id: brand_id.to_string(),
                timeout: self.fetch_timeout,
            })??;

        let report = validate(&self.schema, &payload);
        for warning in &report.warnings {
            warn!(
                brand_id = %brand_id,
                kind = warning.kind.as_str(),
                path = %warning.path,
                "brand payload deviates from schema"
            );
        }
        Ok(Arc::new(ResolvedBrand {
            brand_id: brand_id.clone(),
            theme: Arc::new(report.resolved),
            warnings: report.warnings,
        }))
    }

    async fn await_outcome(&self, brand_id: &BrandId, mut receiver: LoadReceiver) -> LoadOutcome {
        let settled = receiver
            .wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|value| (*value).clone());
        settled.unwrap_or_else(|| {
            let error = Arc::new(FetchError::Abandoned {
                brand_id: brand_id.to_string(),
            });
            self.cache.fail_in_flight(brand_id, &error);
            Err(error)
        })
    }

    /// Make `outcome` visible if this manager is still loading `brand_id`.
    fn settle(&self, brand_id: &BrandId, outcome: &LoadOutcome) {
        let mut state = self.lock_state();
        if !matches!(&state.phase, ThemePhase::Loading(loading) if loading == brand_id) {
            if state.selection.as_ref() != Some(brand_id) {
                debug!(brand_id = %brand_id, "brand load superseded; result cached only");
            }
            return;
        }
        match outcome {
            Ok(brand) => self.show(&mut state, Arc::clone(brand)),
            Err(error) => {
                warn!(brand_id = %brand_id, error = %error.detail(), "brand theme unavailable");
                self.revert_to_base(&mut state, brand_id, false);
            }
        }
    }

    fn show(&self, state: &mut ManagerState, brand: Arc<ResolvedBrand>) {
        let mode = state.mode;
        let summary = state.applier.apply(Some(&brand.theme), mode);
        state.phase = ThemePhase::BrandApplied(brand.brand_id.clone());
        info!(
            brand_id = %brand.brand_id,
            mode = %mode,
            written = summary.written,
            removed = summary.removed,
            "brand theme applied"
        );
        self.events.publish(ThemeEvent::BrandApplied {
            brand_id: brand.brand_id.to_string(),
            mode,
        });
        state.visible = Some(brand);
    }

    fn revert_to_base(&self, state: &mut ManagerState, brand_id: &BrandId, cached: bool) {
        state.selection = None;
        state.visible = None;
        let mode = state.mode;
        state.applier.apply(None, mode);
        state.phase = ThemePhase::BaseApplied;
        self.events.publish(ThemeEvent::BrandFailed {
            brand_id: brand_id.to_string(),
            cached,
        });
    }
}

/// Spawned fetch for one brand; publishes exactly one outcome, even when dropped early.
struct LoadTask {
    inner: Arc<ManagerInner>,
    brand_id: BrandId,
    sender: Option<LoadSender>,
}

impl LoadTask {
    fn finish(&mut self, outcome: LoadOutcome) {
        let Some(sender) = self.sender.take() else {
            return;
        };
        self.inner.cache.complete(&self.brand_id, &outcome);
        self.inner.settle(&self.brand_id, &outcome);
        sender.send_replace(Some(outcome));
    }
}

impl Drop for LoadTask {
    fn drop(&mut self) {
        if self.sender.is_some() {
            warn!(brand_id = %self.brand_id, "brand load ended without an outcome");
            let error = Arc::new(FetchError::Abandoned {
                brand_id: self.brand_id.to_string(),
            });
            self.finish(Err(error));
        }
    }
}

async fn run_load(mut task: LoadTask) {
    let outcome = task.inner.resolve(&task.brand_id).await;
    task.finish(outcome);
}

async fn follow_load(inner: Arc<ManagerInner>, brand_id: BrandId, receiver: LoadReceiver) {
    let outcome = inner.await_outcome(&brand_id, receiver).await;
    inner.settle(&brand_id, &outcome);
}
