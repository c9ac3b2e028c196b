//! Token sources, schemas and brand payloads shared by test suites.

use serde_json::{Value, json};
use tessera_tokens::{
    BrandThemeSchema, TokenCategory, TokenResult, TokenSource, TokenValue, compile,
};

/// Light fallback of `color.primary` in the scenario schema.
pub const PRIMARY_LIGHT: &str = "#10B981";
/// Dark fallback of `color.primary` in the scenario schema.
pub const PRIMARY_DARK: &str = "#34D399";
/// Fallback of `shadow.raised` in the scenario schema.
pub const RAISED_SHADOW: &str = "0 1px 2px rgba(0,0,0,.2)";

/// Base source with a single shadow and a spacing token.
#[must_use]
pub fn scenario_base() -> TokenSource {
    TokenSource::new("base")
        .with_token(
            TokenCategory::Shadow,
            "raised",
            TokenValue::uniform(RAISED_SHADOW),
        )
        .with_token(TokenCategory::Spacing, "md", TokenValue::uniform("12px"))
}

/// Brand source with the primary color and a font stack.
#[must_use]
pub fn scenario_brand() -> TokenSource {
    TokenSource::new("brand")
        .with_token(
            TokenCategory::Color,
            "primary",
            TokenValue::per_mode(PRIMARY_LIGHT, PRIMARY_DARK),
        )
        .with_token(
            TokenCategory::Font,
            "sans",
            TokenValue::uniform("Inter, sans-serif"),
        )
}

/// Schema compiled from [`scenario_base`] and [`scenario_brand`].
///
/// # Errors
///
/// Propagates compiler errors; the fixtures are expected to compile.
pub fn scenario_schema() -> TokenResult<BrandThemeSchema> {
    Ok(compile(&scenario_base(), &scenario_brand())?.schema)
}

/// Payload overriding only the light primary color.
#[must_use]
pub fn light_primary_payload() -> Value {
    json!({ "color": { "primary": { "light": "#00AA55" } } })
}

/// Payload overriding every scenario token.
#[must_use]
pub fn acme_payload() -> Value {
    json!({
        "color": { "primary": { "light": "#AA0000", "dark": "#FF5555" } },
        "font": { "sans": "\"Acme Sans\", sans-serif" },
        "shadow": { "raised": "0 2px 4px rgba(0,0,0,.3)" },
        "spacing": { "md": "14px" }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_schema_compiles() -> Result<(), Box<dyn std::error::Error>> {
        let schema = scenario_schema()?;
        assert_eq!(schema.len(), 4);
        assert!(schema.get(TokenCategory::Color, "primary").is_some());
        Ok(())
    }
}
