//! Token categories, theme modes and declared token sources.
//!
//! # Design
//! - Category and mode enums are declared in the lexicographic order of their wire ids,
//!   so ordered maps keyed by them iterate in artifact order.
//! - A `TokenSource` is pure data: category, then token name, then fallback value.
//! - Only color tokens vary by mode; every other category carries one value.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{TokenError, TokenResult};
use crate::shape::ValueShape;

/// Attribute carried by the scoping root to select the color mode.
pub const MODE_ATTRIBUTE: &str = "data-theme";

/// Closed set of token categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenCategory {
    /// Transition timing values.
    Animation,
    /// Brand colors, one value per mode.
    Color,
    /// Font family stacks.
    Font,
    /// Corner radii.
    Radius,
    /// Box shadows.
    Shadow,
    /// Spacing scale.
    Spacing,
    /// Stacking order.
    ZIndex,
}

impl TokenCategory {
    /// Every category in artifact order.
    pub const ALL: [Self; 7] = [
        Self::Animation,
        Self::Color,
        Self::Font,
        Self::Radius,
        Self::Shadow,
        Self::Spacing,
        Self::ZIndex,
    ];

    /// Identifier used in token sources and brand payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Animation => "animation",
            Self::Color => "color",
            Self::Font => "font",
            Self::Radius => "radius",
            Self::Shadow => "shadow",
            Self::Spacing => "spacing",
            Self::ZIndex => "zIndex",
        }
    }

    /// Prefix used for the category's custom properties.
    ///
    /// Matches the wire identifier except for `zIndex`, whose prefix is `z-index`.
    #[must_use]
    pub const fn css_prefix(self) -> &'static str {
        match self {
            Self::ZIndex => "z-index",
            other => other.as_str(),
        }
    }

    /// Whether tokens in this category carry one value per theme mode.
    #[must_use]
    pub const fn is_mode_dependent(self) -> bool {
        matches!(self, Self::Color)
    }

    /// Syntactic shape every value in this category must match.
    #[must_use]
    pub const fn shape(self) -> ValueShape {
        match self {
            Self::Animation => ValueShape::Timing,
            Self::Color => ValueShape::Color,
            Self::Font => ValueShape::FontFamily,
            Self::Radius | Self::Spacing => ValueShape::Length,
            Self::Shadow => ValueShape::ShadowLayers,
            Self::ZIndex => ValueShape::ZIndex,
        }
    }

    /// Custom-property name `--<prefix>-<token>` for a token in this category.
    ///
    /// The prefix comes from [`Self::css_prefix`], so `zIndex` tokens become
    /// `--z-index-<token>` rather than `--zIndex-<token>`.
    #[must_use]
    pub fn property_name(self, token: &str) -> String {
        format!("--{}-{token}", self.css_prefix())
    }

    /// Parse a wire identifier.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
    }
}

impl Display for TokenCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Light or dark rendering of the theme.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light theme mode.
    #[default]
    Light,
    /// Dark theme mode.
    Dark,
}

impl ThemeMode {
    /// Both modes, light first.
    pub const ALL: [Self; 2] = [Self::Light, Self::Dark];

    /// String identifier used in CSS datasets.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The opposite mode.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Parse a mode identifier (`light` or `dark`, case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

impl Display for ThemeMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-mode values of a color token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModeValues {
    /// Value used in light mode.
    pub light: String,
    /// Value used in dark mode.
    pub dark: String,
}

impl ModeValues {
    /// Value for the requested mode.
    #[must_use]
    pub fn get(&self, mode: ThemeMode) -> &str {
        match mode {
            ThemeMode::Light => &self.light,
            ThemeMode::Dark => &self.dark,
        }
    }
}

/// Declared fallback of a token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
    /// Mode-independent value.
    Uniform(String),
    /// One value per theme mode.
    PerMode(ModeValues),
}

impl TokenValue {
    /// Build a mode-independent value.
    #[must_use]
    pub fn uniform(value: impl Into<String>) -> Self {
        Self::Uniform(value.into())
    }

    /// Build a per-mode value.
    #[must_use]
    pub fn per_mode(light: impl Into<String>, dark: impl Into<String>) -> Self {
        Self::PerMode(ModeValues {
            light: light.into(),
            dark: dark.into(),
        })
    }

    /// Value that applies in `mode`.
    #[must_use]
    pub fn for_mode(&self, mode: ThemeMode) -> &str {
        match self {
            Self::Uniform(value) => value,
            Self::PerMode(values) => values.get(mode),
        }
    }
}

impl Display for TokenValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform(value) => f.write_str(value),
            Self::PerMode(values) => write!(f, "light: {}, dark: {}", values.light, values.dark),
        }
    }
}

/// Named, statically declared set of tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenSource {
    name: String,
    tokens: BTreeMap<TokenCategory, BTreeMap<String, TokenValue>>,
}

impl TokenSource {
    /// Create an empty source.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tokens: BTreeMap::new(),
        }
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_token(
        mut self,
        category: TokenCategory,
        name: impl Into<String>,
        value: TokenValue,
    ) -> Self {
        self.insert(category, name, value);
        self
    }

    /// Insert a token, returning the value it replaced.
    pub fn insert(
        &mut self,
        category: TokenCategory,
        name: impl Into<String>,
        value: TokenValue,
    ) -> Option<TokenValue> {
        self.tokens
            .entry(category)
            .or_default()
            .insert(name.into(), value)
    }

    /// Decode a source document of the form `{ "<category>": { "<name>": <value> } }`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::SourceDecode`] when the document is not valid JSON, names an
    /// unknown category, or holds a value that is neither a string nor a
    /// `{ "light", "dark" }` object.
    pub fn from_json_str(name: impl Into<String>, text: &str) -> TokenResult<Self> {
        let name = name.into();
        let tokens = serde_json::from_str(text).map_err(|source| TokenError::SourceDecode {
            source_name: name.clone(),
            source,
        })?;
        Ok(Self { name, tokens })
    }

    /// Source name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a single token.
    #[must_use]
    pub fn get(&self, category: TokenCategory, name: &str) -> Option<&TokenValue> {
        self.tokens.get(&category).and_then(|tokens| tokens.get(name))
    }

    /// Iterate tokens ordered by category, then name.
    pub fn iter(&self) -> impl Iterator<Item = (TokenCategory, &str, &TokenValue)> {
        self.tokens.iter().flat_map(|(category, tokens)| {
            tokens
                .iter()
                .map(move |(name, value)| (*category, name.as_str(), value))
        })
    }

    /// Number of declared tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.values().map(BTreeMap::len).sum()
    }

    /// Whether the source declares no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
