//! Syntactic value shapes for token fallbacks and brand payload values.
//!
//! # Design
//! - Checks are syntactic only; a value that passes is safe to drop into a custom
//!   property declaration but is not guaranteed to render.
//! - Every shape rejects declaration and block delimiters so a value can never escape
//!   its property.
//! - Failures report a short machine-readable reason.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Longest accepted value, in bytes.
pub const MAX_VALUE_LEN: usize = 256;

const FORBIDDEN_CHARS: &[char] = &[';', '{', '}', '<', '>', '\n', '\r', '\\'];

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$")
        .expect("hex color pattern is valid")
});
static COLOR_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:rgba?|hsla?|hwb|lab|lch|oklab|oklch)\([^()]*\)$")
        .expect("color function pattern is valid")
});
static KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$").expect("keyword pattern is valid"));
static VAR_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^var\(--[a-zA-Z0-9_-]+\)$").expect("var reference pattern is valid")
});
static LENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:0|-?(?:\d+(?:\.\d+)?|\.\d+)(?:px|rem|em|%|vh|vw|ch))$")
        .expect("length pattern is valid")
});
static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:auto|-?\d{1,9})$").expect("integer pattern is valid"));
static FAMILY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:"[^"]+"|'[^']+'|[a-zA-Z][a-zA-Z0-9 -]*)$"#)
        .expect("family name pattern is valid")
});
static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+(?:\.\d+)?|\.\d+)(?:ms|s)$").expect("time pattern is valid")
});
static EASING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:linear|ease|ease-in|ease-out|ease-in-out|step-start|step-end|(?:cubic-bezier|steps)\([^()]*\))$",
    )
    .expect("easing pattern is valid")
});

/// Expected syntactic shape of a token value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueShape {
    /// Hex, functional notation, keyword, or `var()` reference.
    Color,
    /// `none` or comma-separated shadow layers.
    ShadowLayers,
    /// Zero or a number with a length unit.
    Length,
    /// `auto` or an integer.
    ZIndex,
    /// Comma-separated family names.
    FontFamily,
    /// Durations and easing functions.
    Timing,
}

impl ValueShape {
    /// Identifier used in the serialized schema.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::ShadowLayers => "shadowLayers",
            Self::Length => "length",
            Self::ZIndex => "zIndex",
            Self::FontFamily => "fontFamily",
            Self::Timing => "timing",
        }
    }

    /// Check `value` against this shape.
    ///
    /// # Errors
    ///
    /// Returns a short reason when the value does not match.
    pub fn check(self, value: &str) -> Result<(), &'static str> {
        check_common(value)?;
        let value = value.trim();
        match self {
            Self::Color => check_color(value),
            Self::ShadowLayers => check_shadow(value),
            Self::Length => LENGTH
                .is_match(value)
                .then_some(())
                .ok_or("not a length"),
            Self::ZIndex => INTEGER
                .is_match(value)
                .then_some(())
                .ok_or("not an integer"),
            Self::FontFamily => check_font_family(value),
            Self::Timing => check_timing(value),
        }
    }
}

fn check_common(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("empty value");
    }
    if value.len() > MAX_VALUE_LEN {
        return Err("value too long");
    }
    if value.contains(FORBIDDEN_CHARS) {
        return Err("forbidden character");
    }
    Ok(())
}

fn check_color(value: &str) -> Result<(), &'static str> {
    let matched = HEX_COLOR.is_match(value)
        || COLOR_FUNCTION.is_match(value)
        || KEYWORD.is_match(value)
        || VAR_REFERENCE.is_match(value);
    matched.then_some(()).ok_or("not a color")
}

fn check_font_family(value: &str) -> Result<(), &'static str> {
    for family in split_top_level(value, |ch| ch == ',')? {
        let family = family.trim();
        if family.is_empty() {
            return Err("empty list entry");
        }
        if !(FAMILY_NAME.is_match(family) || VAR_REFERENCE.is_match(family)) {
            return Err("not a font family list");
        }
    }
    Ok(())
}

fn check_timing(value: &str) -> Result<(), &'static str> {
    let mut durations = 0_usize;
    for part in split_top_level(value, char::is_whitespace)? {
        if part.is_empty() {
            continue;
        }
        if TIME.is_match(part) {
            durations += 1;
        } else if !EASING.is_match(part) {
            return Err("not a timing value");
        }
    }
    match durations {
        1 | 2 => Ok(()),
        _ => Err("timing needs one or two durations"),
    }
}

fn check_shadow(value: &str) -> Result<(), &'static str> {
    if value == "none" {
        return Ok(());
    }
    for layer in split_top_level(value, |ch| ch == ',')? {
        check_shadow_layer(layer.trim())?;
    }
    Ok(())
}

fn check_shadow_layer(layer: &str) -> Result<(), &'static str> {
    if layer.is_empty() {
        return Err("empty list entry");
    }
    let mut insets = 0_usize;
    let mut lengths = 0_usize;
    let mut colors = 0_usize;
    for part in split_top_level(layer, char::is_whitespace)? {
        if part.is_empty() {
            continue;
        }
        if part == "inset" {
            insets += 1;
        } else if LENGTH.is_match(part) {
            lengths += 1;
        } else if check_color(part).is_ok() {
            colors += 1;
        } else {
            return Err("not a shadow");
        }
    }
    if insets > 1 {
        return Err("repeated inset keyword");
    }
    if !(2..=4).contains(&lengths) {
        return Err("shadow needs two to four lengths");
    }
    if colors > 1 {
        return Err("more than one color in shadow layer");
    }
    Ok(())
}

/// Split `value` on separators that sit outside parentheses.
fn split_top_level(
    value: &str,
    is_separator: impl Fn(char) -> bool,
) -> Result<Vec<&str>, &'static str> {
    let mut parts = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0_usize;
    for (index, ch) in value.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1).ok_or("unbalanced parentheses")?,
            _ if depth == 0 && is_separator(ch) => {
                parts.push(&value[start..index]);
                start = index + ch.len_utf8();
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unbalanced parentheses");
    }
    parts.push(&value[start..]);
    Ok(parts)
}
