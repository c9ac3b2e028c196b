//! Fallback-complete token values ready for application.

use std::collections::BTreeMap;

use serde::Serialize;
use tessera_tokens::{BrandThemeSchema, ThemeMode, TokenCategory, TokenValue};

/// Resolved value of one schema token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedToken {
    /// Token category.
    pub category: TokenCategory,
    /// Token name.
    pub name: String,
    /// Value, with both modes kept for colors.
    pub value: TokenValue,
}

/// Every schema token mapped to a value, keyed by custom-property name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedTheme {
    tokens: BTreeMap<String, ResolvedToken>,
}

impl ResolvedTheme {
    /// Theme made entirely of the schema's fallbacks.
    #[must_use]
    pub fn from_fallbacks(schema: &BrandThemeSchema) -> Self {
        let tokens = schema
            .iter()
            .map(|token| {
                (
                    token.property.clone(),
                    ResolvedToken {
                        category: token.category,
                        name: token.name.clone(),
                        value: token.fallback.clone(),
                    },
                )
            })
            .collect();
        Self { tokens }
    }

    pub(crate) fn set_value(&mut self, property: &str, value: TokenValue) {
        if let Some(token) = self.tokens.get_mut(property) {
            token.value = value;
        }
    }

    /// Token resolved for `property`.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&ResolvedToken> {
        self.tokens.get(property)
    }

    /// Value of `property` in `mode`.
    #[must_use]
    pub fn value(&self, property: &str, mode: ThemeMode) -> Option<&str> {
        self.tokens
            .get(property)
            .map(|token| token.value.for_mode(mode))
    }

    /// Every property with its value in `mode`.
    #[must_use]
    pub fn properties(&self, mode: ThemeMode) -> BTreeMap<String, String> {
        self.properties_where(mode, |_| true)
    }

    /// Mode-dependent properties with their value in `mode`.
    #[must_use]
    pub fn mode_properties(&self, mode: ThemeMode) -> BTreeMap<String, String> {
        self.properties_where(mode, TokenCategory::is_mode_dependent)
    }

    fn properties_where(
        &self,
        mode: ThemeMode,
        include: impl Fn(TokenCategory) -> bool,
    ) -> BTreeMap<String, String> {
        self.tokens
            .iter()
            .filter(|(_, token)| include(token.category))
            .map(|(property, token)| (property.clone(), token.value.for_mode(mode).to_string()))
            .collect()
    }

    /// Tokens ordered by property name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedToken)> {
        self.tokens
            .iter()
            .map(|(property, token)| (property.as_str(), token))
    }

    /// Number of resolved tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether no tokens are resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
