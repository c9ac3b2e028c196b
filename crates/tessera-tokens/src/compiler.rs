//! Offline token compiler.
//!
//! # Design
//! - Merges a base and a brand source into one schema; names are unique within a
//!   category of one source and across both sources.
//! - Every fallback is shape-checked before anything is rendered, so an error blocks
//!   all artifacts.
//! - Output depends only on the sorted schema, which makes compilation byte-stable.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::css::render_sheet;
use crate::error::{TokenError, TokenResult};
use crate::model::{ThemeMode, TokenCategory, TokenSource, TokenValue};
use crate::preset::Preset;
use crate::schema::{BrandThemeSchema, SchemaToken, TokenOrigin};

static TOKEN_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("token name pattern is valid"));

/// Everything the compiler emits for one base/brand pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledArtifacts {
    /// Custom-property sheet.
    pub css_sheet: String,
    /// Styling-framework preset.
    pub preset: Preset,
    /// Runtime validation schema.
    pub schema: BrandThemeSchema,
}

/// Compile `base` and `brand` into the CSS sheet, preset, and schema.
///
/// # Errors
///
/// - [`TokenError::InvalidTokenName`] when a name is not a lowercase kebab identifier.
/// - [`TokenError::DuplicateToken`] when a name is declared by both sources.
/// - [`TokenError::MalformedFallback`] when a fallback fails its category's shape, a
///   color lacks per-mode values, or a non-color token declares them.
pub fn compile(base: &TokenSource, brand: &TokenSource) -> TokenResult<CompiledArtifacts> {
    let mut seen: HashMap<&str, TokenCategory> = HashMap::new();
    let mut tokens = Vec::with_capacity(base.len() + brand.len());

    for (category, name, value) in base.iter() {
        check_name(category, name)?;
        seen.entry(name).or_insert(category);
        tokens.push(schema_token(category, name, value, TokenOrigin::Base)?);
    }
    for (category, name, value) in brand.iter() {
        check_name(category, name)?;
        if let Some(first_category) = seen.get(name) {
            return Err(TokenError::DuplicateToken {
                name: name.to_string(),
                first_source: base.name().to_string(),
                first_category: *first_category,
                second_source: brand.name().to_string(),
                second_category: category,
            });
        }
        tokens.push(schema_token(category, name, value, TokenOrigin::Brand)?);
    }

    let schema = BrandThemeSchema::new(tokens);
    let css_sheet = render_sheet(&schema);
    let preset = Preset::from_schema(&schema);
    debug!(
        tokens = schema.len(),
        base = base.name(),
        brand = brand.name(),
        "compiled token artifacts"
    );

    Ok(CompiledArtifacts {
        css_sheet,
        preset,
        schema,
    })
}

fn check_name(category: TokenCategory, name: &str) -> TokenResult<()> {
    if TOKEN_NAME.is_match(name) {
        Ok(())
    } else {
        Err(TokenError::InvalidTokenName {
            category,
            name: name.to_string(),
        })
    }
}

fn schema_token(
    category: TokenCategory,
    name: &str,
    value: &TokenValue,
    origin: TokenOrigin,
) -> TokenResult<SchemaToken> {
    let shape = category.shape();
    let malformed =
        |mode: Option<ThemeMode>, value: &str, reason: &'static str| TokenError::MalformedFallback {
            category,
            name: name.to_string(),
            mode,
            value: value.to_string(),
            reason,
        };

    match (category.is_mode_dependent(), value) {
        (true, TokenValue::PerMode(values)) => {
            for mode in ThemeMode::ALL {
                let candidate = values.get(mode);
                shape
                    .check(candidate)
                    .map_err(|reason| malformed(Some(mode), candidate, reason))?;
            }
        }
        (true, TokenValue::Uniform(single)) => {
            return Err(malformed(None, single, "color tokens need light and dark values"));
        }
        (false, TokenValue::Uniform(single)) => {
            shape
                .check(single)
                .map_err(|reason| malformed(None, single, reason))?;
        }
        (false, TokenValue::PerMode(_)) => {
            return Err(malformed(
                None,
                &value.to_string(),
                "only color tokens vary by mode",
            ));
        }
    }

    Ok(SchemaToken {
        category,
        name: name.to_string(),
        property: category.property_name(name),
        shape,
        fallback: value.clone(),
        origin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> TokenSource {
        TokenSource::new("base").with_token(
            TokenCategory::Shadow,
            "raised",
            TokenValue::uniform("0 1px 2px rgba(0,0,0,.2)"),
        )
    }

    fn brand() -> TokenSource {
        TokenSource::new("brand").with_token(
            TokenCategory::Color,
            "primary",
            TokenValue::per_mode("#10B981", "#34D399"),
        )
    }

    #[test]
    fn schema_records_origin_and_property() -> Result<(), Box<dyn std::error::Error>> {
        let artifacts = compile(&base(), &brand())?;
        let primary = artifacts
            .schema
            .get(TokenCategory::Color, "primary")
            .ok_or("missing primary")?;
        assert_eq!(primary.origin, TokenOrigin::Brand);
        assert_eq!(primary.property, "--color-primary");
        assert_eq!(artifacts.schema.len(), 2);
        Ok(())
    }

    #[test]
    fn same_name_across_sources_is_duplicate() {
        let brand = brand().with_token(
            TokenCategory::Radius,
            "raised",
            TokenValue::uniform("4px"),
        );
        let err = compile(&base(), &brand).expect_err("duplicate must fail");
        match err {
            TokenError::DuplicateToken {
                name,
                first_category,
                second_category,
                ..
            } => {
                assert_eq!(name, "raised");
                assert_eq!(first_category, TokenCategory::Shadow);
                assert_eq!(second_category, TokenCategory::Radius);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn same_name_in_two_categories_of_one_source_is_allowed() {
        let base = base().with_token(TokenCategory::Spacing, "raised", TokenValue::uniform("4px"));
        assert!(compile(&base, &brand()).is_ok());
    }

    #[test]
    fn malformed_dark_fallback_names_the_mode() {
        let brand = TokenSource::new("brand").with_token(
            TokenCategory::Color,
            "primary",
            TokenValue::per_mode("#10B981", "#34D39"),
        );
        let err = compile(&base(), &brand).expect_err("malformed must fail");
        assert!(matches!(
            err,
            TokenError::MalformedFallback {
                mode: Some(ThemeMode::Dark),
                reason: "not a color",
                ..
            }
        ));
    }

    #[test]
    fn mode_arity_is_enforced() {
        let uniform_color = TokenSource::new("brand").with_token(
            TokenCategory::Color,
            "primary",
            TokenValue::uniform("#10B981"),
        );
        assert!(matches!(
            compile(&base(), &uniform_color),
            Err(TokenError::MalformedFallback { mode: None, .. })
        ));

        let per_mode_radius = TokenSource::new("base").with_token(
            TokenCategory::Radius,
            "md",
            TokenValue::per_mode("4px", "8px"),
        );
        assert!(matches!(
            compile(&per_mode_radius, &brand()),
            Err(TokenError::MalformedFallback {
                reason: "only color tokens vary by mode",
                ..
            })
        ));
    }

    #[test]
    fn names_must_be_kebab_case() {
        let brand = TokenSource::new("brand").with_token(
            TokenCategory::Color,
            "Primary_Hover",
            TokenValue::per_mode("#fff", "#000"),
        );
        assert!(matches!(
            compile(&base(), &brand),
            Err(TokenError::InvalidTokenName { .. })
        ));
    }
}
