//! Styling-framework preset derived from the schema.
//!
//! # Design
//! - Every declaration references a custom property through `var()`; literal token
//!   values never appear in the preset, so runtime overrides flow through.
//! - The theme-extension map mirrors the shape utility frameworks expect
//!   (`colors`, `boxShadow`, `borderRadius`, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::css::{GENERATED_BANNER, push_block};
use crate::error::{TokenError, TokenResult};
use crate::model::TokenCategory;
use crate::schema::{BrandThemeSchema, SchemaToken};

/// Declarations keyed by CSS property.
pub type Declarations = BTreeMap<String, String>;

/// Theme-extension map plus generated utility classes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Framework theme key, then token name, then `var(--...)` reference.
    pub theme: BTreeMap<String, BTreeMap<String, String>>,
    /// Utility class name (without the leading dot), then declarations.
    pub utilities: BTreeMap<String, Declarations>,
}

impl Preset {
    /// Derive the preset from a compiled schema.
    #[must_use]
    pub fn from_schema(schema: &BrandThemeSchema) -> Self {
        let mut preset = Self::default();
        for token in schema.iter() {
            let reference = format!("var({})", token.property);
            preset
                .theme
                .entry(theme_key(token.category).to_string())
                .or_default()
                .insert(token.name.clone(), reference.clone());
            for (prefix, property, value) in utility_rules(token, &reference) {
                preset
                    .utilities
                    .entry(format!("{prefix}-{}", token.name))
                    .or_default()
                    .insert(property.to_string(), value);
            }
        }
        preset
    }

    /// Encode the preset as pretty JSON with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Encode`] if serialization fails.
    pub fn to_json(&self) -> TokenResult<String> {
        let mut text = serde_json::to_string_pretty(self).map_err(|source| TokenError::Encode {
            artifact: "preset",
            source,
        })?;
        text.push('\n');
        Ok(text)
    }

    /// Declarations of a single utility class.
    #[must_use]
    pub fn utility(&self, class: &str) -> Option<&Declarations> {
        self.utilities.get(class)
    }

    /// Render the utility classes as a stylesheet.
    #[must_use]
    pub fn render_utilities_css(&self) -> String {
        let mut css = String::from(GENERATED_BANNER);
        for (class, declarations) in &self.utilities {
            let pairs: Vec<(&str, &str)> = declarations
                .iter()
                .map(|(property, value)| (property.as_str(), value.as_str()))
                .collect();
            push_block(&mut css, &format!(".{class}"), &pairs);
        }
        css
    }
}

const fn theme_key(category: TokenCategory) -> &'static str {
    match category {
        TokenCategory::Animation => "animation",
        TokenCategory::Color => "colors",
        TokenCategory::Font => "fontFamily",
        TokenCategory::Radius => "borderRadius",
        TokenCategory::Shadow => "boxShadow",
        TokenCategory::Spacing => "spacing",
        TokenCategory::ZIndex => "zIndex",
    }
}

fn utility_rules(
    token: &SchemaToken,
    reference: &str,
) -> Vec<(&'static str, &'static str, String)> {
    match token.category {
        TokenCategory::Animation => vec![("transition", "transition", format!("all {reference}"))],
        TokenCategory::Color => vec![
            ("bg", "background-color", reference.to_string()),
            ("text", "color", reference.to_string()),
            ("border", "border-color", reference.to_string()),
        ],
        TokenCategory::Font => vec![("font", "font-family", reference.to_string())],
        TokenCategory::Radius => vec![("rounded", "border-radius", reference.to_string())],
        TokenCategory::Shadow => vec![("shadow", "box-shadow", reference.to_string())],
        TokenCategory::Spacing => vec![
            ("p", "padding", reference.to_string()),
            ("m", "margin", reference.to_string()),
            ("gap", "gap", reference.to_string()),
        ],
        TokenCategory::ZIndex => vec![("z", "z-index", reference.to_string())],
    }
}
