#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Runtime theming: brand payload validation, caching, and live style application.
//!
//! Layout: `validate.rs` (payload validation into a `ResolvedTheme`), `apply.rs` (the
//! style root seam and diffing applier), `fetch.rs` (HTTP and directory fetchers),
//! `cache.rs` (per-brand cache), `manager.rs` (`ThemeManager` state machine),
//! `config.rs`, `events.rs`, `preference.rs`, `brand.rs`, `resolved.rs`, `error.rs`.

pub mod apply;
pub mod brand;
pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod fetch;
pub mod manager;
pub mod preference;
pub mod resolved;
pub mod validate;

pub use apply::{ApplySummary, InMemoryStyleRoot, StyleApplier, StyleRoot};
pub use brand::BrandId;
pub use cache::{CacheState, ResolvedBrand, ThemeCache};
pub use config::ThemeConfig;
pub use error::{FetchError, ThemeError, ThemeResult};
pub use events::{ThemeEvent, ThemeEventBus};
pub use fetch::{BrandFetcher, DirectoryBrandFetcher, HttpBrandFetcher};
pub use manager::{BrandLoad, LoadSource, LoadStatus, ManagerDependencies, ThemeManager, ThemePhase};
pub use preference::{CookieModePreference, FixedModePreference, ModePreference};
pub use resolved::{ResolvedTheme, ResolvedToken};
pub use validate::{ValidationReport, ValidationWarning, WarningKind, validate};
