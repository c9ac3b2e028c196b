//! Custom-property sheet renderer.

use crate::model::{MODE_ATTRIBUTE, ThemeMode};
use crate::schema::BrandThemeSchema;

/// Banner written at the top of generated stylesheets.
pub const GENERATED_BANNER: &str = "/* Generated by tessera-tokens. Do not edit. */\n";

/// Selector for mode-independent tokens.
pub const ROOT_SELECTOR: &str = ":root";

/// Selector scoping color tokens for `mode`.
#[must_use]
pub fn mode_selector(mode: ThemeMode) -> String {
    match mode {
        ThemeMode::Light => format!(":root, [{MODE_ATTRIBUTE}=\"light\"]"),
        ThemeMode::Dark => format!("[{MODE_ATTRIBUTE}=\"dark\"]"),
    }
}

/// Render the custom-property sheet for `schema`.
///
/// Mode-independent tokens land in `:root`; colors are split into a light scope that is
/// also the default and a dark scope keyed by the mode attribute. Empty blocks are
/// omitted.
#[must_use]
pub fn render_sheet(schema: &BrandThemeSchema) -> String {
    let mut css = String::from(GENERATED_BANNER);

    let shared: Vec<(&str, &str)> = schema
        .iter()
        .filter(|token| !token.category.is_mode_dependent())
        .map(|token| {
            (
                token.property.as_str(),
                token.fallback.for_mode(ThemeMode::Light),
            )
        })
        .collect();
    push_block(&mut css, ROOT_SELECTOR, &shared);

    for mode in ThemeMode::ALL {
        let colors: Vec<(&str, &str)> = schema
            .iter()
            .filter(|token| token.category.is_mode_dependent())
            .map(|token| (token.property.as_str(), token.fallback.for_mode(mode)))
            .collect();
        push_block(&mut css, &mode_selector(mode), &colors);
    }

    css
}

pub(crate) fn push_block(css: &mut String, selector: &str, declarations: &[(&str, &str)]) {
    if declarations.is_empty() {
        return;
    }
    css.push('\n');
    css.push_str(selector);
    css.push_str(" {\n");
    for (property, value) in declarations {
        css.push_str("  ");
        css.push_str(property);
        css.push_str(": ");
        css.push_str(value);
        css.push_str(";\n");
    }
    css.push_str("}\n");
}
