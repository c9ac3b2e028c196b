//! Runtime theming configuration.
//!
//! # Design
//! - Loaded from `TESSERA_THEME_*` environment variables through an injectable lookup,
//!   so tests never touch the process environment.
//! - Unset variables take defaults; set-but-invalid values are errors.

use std::time::Duration;

use reqwest::Url;
use tessera_tokens::ThemeMode;

use crate::error::{ThemeError, ThemeResult};
use crate::fetch::{DirectoryBrandFetcher, HttpBrandFetcher};

/// Environment variable holding the payload base URL.
pub const ENV_BASE_URL: &str = "TESSERA_THEME_BASE_URL";
/// Environment variable holding the payload scope.
pub const ENV_SCOPE: &str = "TESSERA_THEME_SCOPE";
/// Environment variable holding the fetch timeout in seconds.
pub const ENV_FETCH_TIMEOUT: &str = "TESSERA_THEME_FETCH_TIMEOUT_SECS";
/// Environment variable holding the default mode.
pub const ENV_DEFAULT_MODE: &str = "TESSERA_THEME_DEFAULT_MODE";

/// Scope used when none is configured.
pub const DEFAULT_SCOPE: &str = "app";
/// Fetch timeout used when none is configured.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// Longest accepted fetch timeout, in seconds.
pub const MAX_FETCH_TIMEOUT_SECS: u64 = 300;
/// Default capacity of the theme event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Settings for the runtime theme manager and its fetchers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeConfig {
    /// Base URL brand payloads are fetched from.
    pub base_url: Option<Url>,
    /// Path segment(s) between the base and `themes/`.
    pub scope: String,
    /// Upper bound on a single payload fetch.
    pub fetch_timeout: Duration,
    /// Mode used when the preference hook has no answer.
    pub default_mode: ThemeMode,
    /// Capacity of the theme event channel.
    pub event_capacity: usize,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            scope: DEFAULT_SCOPE.to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            default_mode: ThemeMode::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ThemeConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::InvalidConfig`] for set-but-invalid variables.
    pub fn from_env() -> ThemeResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::InvalidConfig`] for set-but-invalid variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ThemeResult<Self> {
        let mut config = Self::default();
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(raw) = read(ENV_BASE_URL) {
            config.base_url = Some(parse_base_url(ENV_BASE_URL, &raw)?);
        }
        if let Some(raw) = read(ENV_SCOPE) {
            config.scope = parse_scope(ENV_SCOPE, &raw)?;
        }
        if let Some(raw) = read(ENV_FETCH_TIMEOUT) {
            config.fetch_timeout = parse_timeout(ENV_FETCH_TIMEOUT, &raw)?;
        }
        if let Some(raw) = read(ENV_DEFAULT_MODE) {
            config.default_mode = ThemeMode::parse(&raw).ok_or_else(|| ThemeError::InvalidConfig {
                field: ENV_DEFAULT_MODE,
                reason: "expected light or dark",
                value: Some(raw.clone()),
            })?;
        }
        Ok(config)
    }

    /// HTTP fetcher for the configured base URL, bounded by the fetch timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::InvalidConfig`] when no base URL is configured.
    pub fn http_fetcher(&self) -> ThemeResult<HttpBrandFetcher> {
        let base_url = self.base_url.clone().ok_or(ThemeError::InvalidConfig {
            field: ENV_BASE_URL,
            reason: "base url is required for http fetching",
            value: None,
        })?;
        let client = reqwest::Client::builder()
            .timeout(self.fetch_timeout)
            .build()
            .unwrap_or_default();
        Ok(HttpBrandFetcher::with_client(client, base_url, self.scope.clone()))
    }

    /// Directory fetcher rooted at `root` using the configured scope.
    #[must_use]
    pub fn directory_fetcher(&self, root: impl Into<std::path::PathBuf>) -> DirectoryBrandFetcher {
        DirectoryBrandFetcher::new(root, self.scope.clone())
    }
}

/// Parse an absolute `http` or `https` base URL.
///
/// # Errors
///
/// Returns [`ThemeError::InvalidConfig`] naming `field` for anything else.
pub fn parse_base_url(field: &'static str, raw: &str) -> ThemeResult<Url> {
    let invalid = |reason| ThemeError::InvalidConfig {
        field,
        reason,
        value: Some(raw.to_string()),
    };
    let url = Url::parse(raw.trim()).map_err(|_| invalid("not an absolute url"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(invalid("scheme must be http or https")),
    }
}

/// Validate a scope made of `/`-separated `[a-z0-9_-]` segments.
///
/// # Errors
///
/// Returns [`ThemeError::InvalidConfig`] naming `field` for empty or unsafe segments.
pub fn parse_scope(field: &'static str, raw: &str) -> ThemeResult<String> {
    let scope = raw.trim().trim_matches('/');
    let valid_segment = |segment: &str| {
        !segment.is_empty()
            && segment != "."
            && segment != ".."
            && segment
                .chars()
                .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '-' | '_'))
    };
    if scope.split('/').all(valid_segment) {
        Ok(scope.to_string())
    } else {
        Err(ThemeError::InvalidConfig {
            field,
            reason: "scope segments must match [a-z0-9_-]+",
            value: Some(raw.to_string()),
        })
    }
}

/// Parse a timeout in whole seconds within `1..=MAX_FETCH_TIMEOUT_SECS`.
///
/// # Errors
///
/// Returns [`ThemeError::InvalidConfig`] naming `field` for non-numeric or
/// out-of-range values.
pub fn parse_timeout(field: &'static str, raw: &str) -> ThemeResult<Duration> {
    let invalid = |reason| ThemeError::InvalidConfig {
        field,
        reason,
        value: Some(raw.to_string()),
    };
    let seconds: u64 = raw.trim().parse().map_err(|_| invalid("expected whole seconds"))?;
    if (1..=MAX_FETCH_TIMEOUT_SECS).contains(&seconds) {
        Ok(Duration::from_secs(seconds))
    } else {
        Err(invalid("timeout must be between 1 and 300 seconds"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() -> Result<(), Box<dyn std::error::Error>> {
        let config = ThemeConfig::from_lookup(lookup(&[]))?;
        assert_eq!(config, ThemeConfig::default());
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.default_mode, ThemeMode::Light);
        Ok(())
    }

    #[test]
    fn values_are_parsed() -> Result<(), Box<dyn std::error::Error>> {
        let config = ThemeConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://cdn.example/assets"),
            (ENV_SCOPE, "/web/eu/"),
            (ENV_FETCH_TIMEOUT, "3"),
            (ENV_DEFAULT_MODE, "dark"),
        ]))?;
        assert_eq!(
            config.base_url.as_ref().map(Url::as_str),
            Some("https://cdn.example/assets")
        );
        assert_eq!(config.scope, "web/eu");
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
        assert_eq!(config.default_mode, ThemeMode::Dark);
        assert!(config.http_fetcher().is_ok());
        Ok(())
    }

    #[test]
    fn invalid_values_name_their_variable() {
        let cases = [
            (ENV_BASE_URL, "ftp://cdn.example"),
            (ENV_BASE_URL, "cdn.example"),
            (ENV_SCOPE, "../etc"),
            (ENV_FETCH_TIMEOUT, "0"),
            (ENV_FETCH_TIMEOUT, "soon"),
            (ENV_DEFAULT_MODE, "dusk"),
        ];
        for (key, value) in cases {
            match ThemeConfig::from_lookup(lookup(&[(key, value)])) {
                Err(ThemeError::InvalidConfig { field, .. }) => assert_eq!(field, key),
                other => panic!("expected invalid config for {key}={value}, got {other:?}"),
            }
        }
    }

    #[test]
    fn http_fetcher_requires_base_url() {
        assert!(matches!(
            ThemeConfig::default().http_fetcher(),
            Err(ThemeError::InvalidConfig {
                field: ENV_BASE_URL,
                ..
            })
        ));
    }
}
