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

//! Design-token model and the offline token compiler.
//!
//! Layout: `model.rs` (categories, modes, token sources), `shape.rs` (value shape
//! checks), `schema.rs` (`BrandThemeSchema`), `css.rs` and `preset.rs` (artifact
//! renderers), `compiler.rs` (`compile`), `output.rs` (artifact files and lock),
//! `defaults.rs` (the shipped design language).

pub mod compiler;
pub mod css;
pub mod defaults;
pub mod error;
pub mod model;
pub mod output;
pub mod preset;
pub mod schema;
pub mod shape;

pub use compiler::{CompiledArtifacts, compile};
pub use error::{TokenError, TokenResult};
pub use model::{MODE_ATTRIBUTE, ModeValues, ThemeMode, TokenCategory, TokenSource, TokenValue};
pub use output::{ArtifactFile, check_artifacts, write_artifacts};
pub use preset::Preset;
pub use schema::{BrandThemeSchema, SCHEMA_VERSION, SchemaToken, TokenOrigin};
pub use shape::ValueShape;
