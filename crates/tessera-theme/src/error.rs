//! Error types for runtime theming.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::brand::BrandId;

/// Transport failures raised while obtaining a brand payload.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP request could not be completed.
    #[error("brand payload request failed")]
    Request {
        /// Requested URL.
        url: String,
        /// Underlying client error.
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("brand payload request returned an error status")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The payload body is not valid JSON.
    #[error("brand payload is not valid JSON")]
    Decode {
        /// URL or path the payload came from.
        location: String,
        /// Underlying decode error.
        source: serde_json::Error,
    },
    /// A bundled payload could not be read.
    #[error("brand payload could not be read")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The payload URL could not be built from the configured base.
    #[error("brand payload location is invalid")]
    Location {
        /// Configured base URL.
        base: String,
        /// Underlying parse error.
        source: url::ParseError,
    },
    /// The fetch did not finish within the configured timeout.
    #[error("brand payload fetch timed out")]
    TimedOut {
        /// Brand being fetched.
        brand_id: String,
        /// Timeout that elapsed.
        timeout: Duration,
    },
    /// The task performing the fetch ended before producing a payload.
    #[error("brand payload fetch was abandoned")]
    Abandoned {
        /// Brand being fetched.
        brand_id: String,
    },
}

impl FetchError {
    /// One-line detail including the structured context.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Request { url, source } => format!("{url}: {source}"),
            Self::Status { url, status } => format!("{url}: status {status}"),
            Self::Decode { location, source } => format!("{location}: {source}"),
            Self::Io { path, source } => format!("{}: {source}", path.display()),
            Self::Location { base, source } => format!("{base}: {source}"),
            Self::TimedOut { brand_id, timeout } => {
                format!("{brand_id}: no response within {}ms", timeout.as_millis())
            }
            Self::Abandoned { brand_id } => format!("{brand_id}: loading task ended early"),
        }
    }
}

/// Primary error type for theme operations.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// A brand identifier failed validation before any URL or path was built.
    #[error("invalid brand identifier")]
    InvalidBrandId {
        /// Identifier supplied by the caller.
        value: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// The brand payload could not be obtained; base styling is in effect.
    #[error("brand theme unavailable")]
    BrandUnavailable {
        /// Brand that failed.
        brand_id: BrandId,
        /// Whether the failure was served from the cache without a new fetch.
        cached: bool,
        /// Transport failure recorded for the brand.
        source: Arc<FetchError>,
    },
    /// A configuration value was invalid.
    #[error("invalid theme configuration")]
    InvalidConfig {
        /// Configuration key.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
}

/// Convenience alias for theme results.
pub type ThemeResult<T> = Result<T, ThemeError>;

impl ThemeError {
    /// One-line detail including the structured context.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidBrandId { value, reason } => format!("'{value}': {reason}"),
            Self::BrandUnavailable {
                brand_id,
                cached,
                source,
            } => {
                let origin = if *cached { "cached failure" } else { "fetch failed" };
                format!("{brand_id} ({origin}): {}", source.detail())
            }
            Self::InvalidConfig {
                field,
                reason,
                value,
            } => value.as_ref().map_or_else(
                || format!("{field}: {reason}"),
                |value| format!("{field}={value}: {reason}"),
            ),
        }
    }
}
