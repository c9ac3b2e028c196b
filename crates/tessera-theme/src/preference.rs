//! Mode preference hooks read once at base-theme initialisation.

use tessera_tokens::ThemeMode;

/// Cookie carrying the stored mode.
pub const MODE_COOKIE: &str = "tessera.mode";

/// Source of the user's stored light/dark preference.
pub trait ModePreference: Send + Sync {
    /// Stored mode, or `None` to use the configured default.
    fn read(&self) -> Option<ThemeMode>;
}

impl<F> ModePreference for F
where
    F: Fn() -> Option<ThemeMode> + Send + Sync,
{
    fn read(&self) -> Option<ThemeMode> {
        self()
    }
}

/// Preference with a fixed answer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedModePreference(pub Option<ThemeMode>);

impl ModePreference for FixedModePreference {
    fn read(&self) -> Option<ThemeMode> {
        self.0
    }
}

/// Preference parsed from a `Cookie` request header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CookieModePreference {
    header: String,
}

impl CookieModePreference {
    /// Wrap a raw `Cookie` header value.
    #[must_use]
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }

    /// Extract the mode from a `Cookie` header; the first recognised value wins.
    #[must_use]
    pub fn parse_header(header: &str) -> Option<ThemeMode> {
        header
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .filter(|(name, _)| name.trim() == MODE_COOKIE)
            .find_map(|(_, value)| parse_stored_mode(value.trim().trim_matches('"')))
    }
}

impl ModePreference for CookieModePreference {
    fn read(&self) -> Option<ThemeMode> {
        Self::parse_header(&self.header)
    }
}

fn parse_stored_mode(value: &str) -> Option<ThemeMode> {
    match value {
        "tessera-dark" | "dark" => Some(ThemeMode::Dark),
        "tessera-light" | "light" => Some(ThemeMode::Light),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_header_accepts_current_and_legacy_values() {
        assert_eq!(
            CookieModePreference::parse_header("session=abc; tessera.mode=dark"),
            Some(ThemeMode::Dark)
        );
        assert_eq!(
            CookieModePreference::parse_header("tessera.mode=\"tessera-light\""),
            Some(ThemeMode::Light)
        );
        assert_eq!(
            CookieModePreference::parse_header("tessera.mode=dusk; other=dark"),
            None
        );
        assert_eq!(CookieModePreference::parse_header(""), None);
    }

    #[test]
    fn closures_act_as_preferences() {
        let preference = || Some(ThemeMode::Dark);
        assert_eq!(ModePreference::read(&preference), Some(ThemeMode::Dark));
        assert_eq!(FixedModePreference(None).read(), None);
        assert_eq!(
            CookieModePreference::new("tessera.mode=light").read(),
            Some(ThemeMode::Light)
        );
    }
}
