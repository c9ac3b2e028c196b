//! The shipped design language.
//!
//! The base source carries the mode-independent scales (shadows, animations, radii,
//! spacing, z-index). The brand source carries the palette, one value per mode, with
//! hover and active shades derived from the primary ramp, plus the font stacks.

use crate::model::{TokenCategory, TokenSource, TokenValue};

/// Name of the built-in base source.
pub const BASE_SOURCE_NAME: &str = "base";
/// Name of the built-in brand source.
pub const BRAND_SOURCE_NAME: &str = "brand";

const SHADOWS: [(&str, &str); 3] = [
    ("flat", "none"),
    ("raised", "0 1px 2px rgba(0,0,0,.2)"),
    (
        "floating",
        "0 4px 12px rgba(0,0,0,.24), 0 1px 3px rgba(0,0,0,.16)",
    ),
];

const ANIMATIONS: [(&str, &str); 3] = [
    ("fast", "120ms ease-out"),
    ("normal", "200ms ease-in-out"),
    ("slow", "320ms cubic-bezier(0.4, 0, 0.2, 1)"),
];

const RADII: [(&str, &str); 4] = [
    ("sm", "4px"),
    ("md", "8px"),
    ("lg", "12px"),
    ("full", "9999px"),
];

const SPACING: [(&str, &str); 6] = [
    ("xs", "4px"),
    ("sm", "8px"),
    ("md", "12px"),
    ("lg", "16px"),
    ("xl", "24px"),
    ("2xl", "32px"),
];

const Z_INDEX: [(&str, &str); 6] = [
    ("base", "0"),
    ("dropdown", "1000"),
    ("sticky", "1100"),
    ("overlay", "1200"),
    ("modal", "1300"),
    ("toast", "1400"),
];

/// Name, light value, dark value.
const COLORS: [(&str, &str, &str); 17] = [
    ("primary", "#265D81", "#4F85B1"),
    ("primary-hover", "#1F4D6A", "#76A0C2"),
    ("primary-active", "#183C52", "#9CBBD3"),
    ("secondary", "#775A96", "#A997C7"),
    ("accent", "#258BD3", "#4497E4"),
    ("background", "#F8F9FA", "#121417"),
    ("surface", "#FFFFFF", "#1A1C20"),
    ("surface-raised", "#F1F3F5", "#1F2226"),
    ("border", "#DEE2E6", "#2B2F34"),
    ("text-primary", "#212529", "#F8F9FA"),
    ("text-secondary", "#495057", "#C8CDD2"),
    ("text-muted", "#6C757D", "#959DA6"),
    ("focus-ring", "rgba(38,93,129,.45)", "rgba(79,133,177,.55)"),
    ("on-primary", "#FFFFFF", "#0A1B23"),
    ("success", "#1E6A51", "#2F9E7A"),
    ("warning", "#A4761A", "#E2AC2F"),
    ("error", "#8E2643", "#C43A61"),
];

const FONTS: [(&str, &str); 2] = [
    ("sans", r#""Inter", system-ui, sans-serif"#),
    ("mono", r#""JetBrains Mono", ui-monospace, monospace"#),
];

/// Mode-independent scales.
#[must_use]
pub fn base_source() -> TokenSource {
    let mut source = TokenSource::new(BASE_SOURCE_NAME);
    let groups: [(TokenCategory, &[(&str, &str)]); 5] = [
        (TokenCategory::Shadow, &SHADOWS),
        (TokenCategory::Animation, &ANIMATIONS),
        (TokenCategory::Radius, &RADII),
        (TokenCategory::Spacing, &SPACING),
        (TokenCategory::ZIndex, &Z_INDEX),
    ];
    for (category, tokens) in groups {
        for (name, value) in tokens {
            source.insert(category, *name, TokenValue::uniform(*value));
        }
    }
    source
}

/// Brand palette and font stacks.
#[must_use]
pub fn brand_source() -> TokenSource {
    let mut source = TokenSource::new(BRAND_SOURCE_NAME);
    for (name, light, dark) in COLORS {
        source.insert(TokenCategory::Color, name, TokenValue::per_mode(light, dark));
    }
    for (name, value) in FONTS {
        source.insert(TokenCategory::Font, name, TokenValue::uniform(value));
    }
    source
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;

    #[test]
    fn built_in_sources_compile() -> Result<(), Box<dyn std::error::Error>> {
        let artifacts = compile(&base_source(), &brand_source())?;
        assert_eq!(
            artifacts.schema.len(),
            SHADOWS.len()
                + ANIMATIONS.len()
                + RADII.len()
                + SPACING.len()
                + Z_INDEX.len()
                + COLORS.len()
                + FONTS.len()
        );
        assert!(artifacts.css_sheet.contains("--z-index-modal: 1300;"));
        assert!(artifacts.css_sheet.contains("--color-primary: #4F85B1;"));
        Ok(())
    }

    #[test]
    fn brand_colors_cover_both_modes() {
        let brand = brand_source();
        assert!(brand.iter().all(|(category, _, value)| {
            category != TokenCategory::Color || matches!(value, TokenValue::PerMode(_))
        }));
    }
}
