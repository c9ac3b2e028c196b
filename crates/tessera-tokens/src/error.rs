//! Error types for token compilation and artifact handling.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::{ThemeMode, TokenCategory};

/// Primary error type for token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The same token name is declared by both sources.
    #[error("duplicate token name")]
    DuplicateToken {
        /// Token name declared twice.
        name: String,
        /// Source holding the first declaration.
        first_source: String,
        /// Category of the first declaration.
        first_category: TokenCategory,
        /// Source holding the second declaration.
        second_source: String,
        /// Category of the second declaration.
        second_category: TokenCategory,
    },
    /// A declared fallback does not match its category's shape.
    #[error("malformed token fallback")]
    MalformedFallback {
        /// Category of the token.
        category: TokenCategory,
        /// Token name.
        name: String,
        /// Mode of the offending value for per-mode tokens.
        mode: Option<ThemeMode>,
        /// Offending value as declared.
        value: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// A token name is not a lowercase kebab identifier.
    #[error("invalid token name")]
    InvalidTokenName {
        /// Category of the token.
        category: TokenCategory,
        /// Offending name.
        name: String,
    },
    /// A token source document could not be decoded.
    #[error("failed to decode token source")]
    SourceDecode {
        /// Name of the source being decoded.
        source_name: String,
        /// Underlying decode error.
        source: serde_json::Error,
    },
    /// A serialized schema could not be decoded.
    #[error("failed to decode theme schema")]
    SchemaDecode {
        /// Underlying decode error.
        source: serde_json::Error,
    },
    /// A serialized schema uses an unsupported version.
    #[error("unsupported theme schema version")]
    SchemaVersion {
        /// Version found in the document.
        found: u32,
        /// Version this build understands.
        expected: u32,
    },
    /// An artifact could not be encoded.
    #[error("failed to encode artifact")]
    Encode {
        /// Artifact being encoded.
        artifact: &'static str,
        /// Underlying encode error.
        source: serde_json::Error,
    },
    /// File system operation failed.
    #[error("filesystem operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Path involved in the failing operation.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// Artifacts on disk differ from freshly compiled output.
    #[error("generated artifacts are out of date")]
    Stale {
        /// Artifact paths that are missing or differ.
        paths: Vec<PathBuf>,
    },
}

/// Convenience alias for token results.
pub type TokenResult<T> = Result<T, TokenError>;

impl TokenError {
    /// One-line human-readable detail including the structured context.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::DuplicateToken {
                name,
                first_source,
                first_category,
                second_source,
                second_category,
            } => format!(
                "token '{name}' declared as {first_category} in '{first_source}' and as {second_category} in '{second_source}'"
            ),
            Self::MalformedFallback {
                category,
                name,
                mode,
                value,
                reason,
            } => mode.map_or_else(
                || format!("{category}.{name} = '{value}': {reason}"),
                |mode| format!("{category}.{name}.{mode} = '{value}': {reason}"),
            ),
            Self::InvalidTokenName { category, name } => {
                format!("{category}.{name}: names must match [a-z0-9][a-z0-9-]*")
            }
            Self::SourceDecode {
                source_name,
                source,
            } => format!("source '{source_name}': {source}"),
            Self::SchemaDecode { source } => source.to_string(),
            Self::SchemaVersion { found, expected } => {
                format!("schema version {found}, expected {expected}")
            }
            Self::Encode { artifact, source } => format!("{artifact}: {source}"),
            Self::Io {
                operation,
                path,
                source,
            } => format!("{operation} {}: {source}", path.display()),
            Self::Stale { paths } => paths
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_names_mode_for_per_mode_values() {
        let err = TokenError::MalformedFallback {
            category: TokenCategory::Color,
            name: "primary".into(),
            mode: Some(ThemeMode::Dark),
            value: "#12".into(),
            reason: "not a color",
        };
        assert_eq!(err.to_string(), "malformed token fallback");
        assert_eq!(err.detail(), "color.primary.dark = '#12': not a color");
    }

    #[test]
    fn detail_lists_stale_paths() {
        let err = TokenError::Stale {
            paths: vec![PathBuf::from("out/tokens.css"), PathBuf::from("out/schema.json")],
        };
        assert_eq!(err.detail(), "out/tokens.css, out/schema.json");
    }
}
