//! Brand payload validation.
//!
//! # Design
//! - Never fails: every schema token ends up with a value, either from the payload or
//!   from its fallback, and every deviation becomes a warning.
//! - Schema pass first (category, then name, then light before dark), structural pass
//!   second, so warning order is stable for a given payload.
//! - Malformed warnings carry the raw wire value, never the fallback.

use serde::Serialize;
use serde_json::{Map, Value};
use tessera_tokens::{
    BrandThemeSchema, ModeValues, SchemaToken, ThemeMode, TokenCategory, TokenValue,
};

use crate::resolved::ResolvedTheme;

/// Classification of a validation warning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningKind {
    /// The payload has no value for a schema token.
    MissingToken,
    /// The payload value has the wrong type or shape.
    MalformedToken,
    /// The payload holds a key the schema does not know.
    UnknownToken,
}

impl WarningKind {
    /// Stable identifier used in logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingToken => "MissingToken",
            Self::MalformedToken => "MalformedToken",
            Self::UnknownToken => "UnknownToken",
        }
    }
}

/// A single validation finding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    /// Warning classification.
    pub kind: WarningKind,
    /// Dotted payload path (`color.primary.dark`), or `$` for the document root.
    pub path: String,
    /// Raw wire value for malformed and unknown entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl ValidationWarning {
    fn missing(path: String) -> Self {
        Self {
            kind: WarningKind::MissingToken,
            path,
            raw: None,
        }
    }

    fn malformed(path: String, raw: &Value) -> Self {
        Self {
            kind: WarningKind::MalformedToken,
            path,
            raw: Some(raw.clone()),
        }
    }

    fn unknown(path: String, raw: &Value) -> Self {
        Self {
            kind: WarningKind::UnknownToken,
            path,
            raw: Some(raw.clone()),
        }
    }
}

/// Outcome of validating a payload against a schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Fallback-complete resolved theme.
    pub resolved: ResolvedTheme,
    /// Findings in deterministic order.
    pub warnings: Vec<ValidationWarning>,
}

/// Validate an untrusted brand payload against `schema`.
#[must_use]
pub fn validate(schema: &BrandThemeSchema, payload: &Value) -> ValidationReport {
    let mut resolved = ResolvedTheme::from_fallbacks(schema);
    let mut warnings = Vec::new();

    let Some(root) = payload.as_object() else {
        warnings.push(ValidationWarning::malformed("$".to_string(), payload));
        return ValidationReport { resolved, warnings };
    };

    for category in TokenCategory::ALL {
        let mut tokens = schema.category(category).peekable();
        if tokens.peek().is_none() {
            continue;
        }
        match root.get(category.as_str()) {
            None => {
                for token in tokens {
                    report_missing(token, &mut warnings);
                }
            }
            Some(Value::Object(entries)) => {
                for token in tokens {
                    resolve_token(token, entries, &mut resolved, &mut warnings);
                }
            }
            Some(other) => {
                warnings.push(ValidationWarning::malformed(
                    category.as_str().to_string(),
                    other,
                ));
            }
        }
    }

    report_unknown(schema, root, &mut warnings);
    ValidationReport { resolved, warnings }
}

fn report_missing(token: &SchemaToken, warnings: &mut Vec<ValidationWarning>) {
    let path = token_path(token);
    if token.category.is_mode_dependent() {
        for mode in ThemeMode::ALL {
            warnings.push(ValidationWarning::missing(format!("{path}.{mode}")));
        }
    } else {
        warnings.push(ValidationWarning::missing(path));
    }
}

fn resolve_token(
    token: &SchemaToken,
    entries: &Map<String, Value>,
    resolved: &mut ResolvedTheme,
    warnings: &mut Vec<ValidationWarning>,
) {
    let path = token_path(token);
    let Some(raw) = entries.get(&token.name) else {
        report_missing(token, warnings);
        return;
    };

    match &token.fallback {
        TokenValue::PerMode(fallback) => {
            let Some(modes) = raw.as_object() else {
                warnings.push(ValidationWarning::malformed(path, raw));
                return;
            };
            let mut values = fallback.clone();
            for mode in ThemeMode::ALL {
                let mode_path = format!("{path}.{mode}");
                match modes.get(mode.as_str()) {
                    None => warnings.push(ValidationWarning::missing(mode_path)),
                    Some(candidate) => match checked_value(token, candidate) {
                        Some(value) => set_mode_value(&mut values, mode, value),
                        None => warnings.push(ValidationWarning::malformed(mode_path, candidate)),
                    },
                }
            }
            resolved.set_value(&token.property, TokenValue::PerMode(values));
        }
        TokenValue::Uniform(_) => match checked_value(token, raw) {
            Some(value) => resolved.set_value(&token.property, TokenValue::Uniform(value)),
            None => warnings.push(ValidationWarning::malformed(path, raw)),
        },
    }
}

fn report_unknown(
    schema: &BrandThemeSchema,
    root: &Map<String, Value>,
    warnings: &mut Vec<ValidationWarning>,
) {
    for (key, value) in sorted(root) {
        let Some(category) = TokenCategory::parse(key)
            .filter(|category| schema.category(*category).next().is_some())
        else {
            warnings.push(ValidationWarning::unknown(key.clone(), value));
            continue;
        };
        let Some(entries) = value.as_object() else {
            continue;
        };
        for (name, raw) in sorted(entries) {
            let path = format!("{key}.{name}");
            if schema.get(category, name).is_none() {
                warnings.push(ValidationWarning::unknown(path, raw));
                continue;
            }
            if !category.is_mode_dependent() {
                continue;
            }
            if let Some(modes) = raw.as_object() {
                for (mode_key, mode_value) in sorted(modes) {
                    if !ThemeMode::ALL.iter().any(|mode| mode.as_str() == mode_key) {
                        warnings.push(ValidationWarning::unknown(
                            format!("{path}.{mode_key}"),
                            mode_value,
                        ));
                    }
                }
            }
        }
    }
}

fn sorted(map: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_unstable_by(|(left, _), (right, _)| left.cmp(right));
    entries
}

fn checked_value(token: &SchemaToken, raw: &Value) -> Option<String> {
    let text = match raw {
        Value::String(text) => text.clone(),
        Value::Number(number) if token.category == TokenCategory::ZIndex => {
            number.as_i64()?.to_string()
        }
        _ => return None,
    };
    token.shape.check(&text).ok().map(|()| text.trim().to_string())
}

fn set_mode_value(values: &mut ModeValues, mode: ThemeMode, value: String) {
    match mode {
        ThemeMode::Light => values.light = value,
        ThemeMode::Dark => values.dark = value,
    }
}

fn token_path(token: &SchemaToken) -> String {
    format!("{}.{}", token.category, token.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tessera_tokens::TokenOrigin;

    fn schema() -> BrandThemeSchema {
        BrandThemeSchema::new(vec![
            SchemaToken {
                category: TokenCategory::ZIndex,
                name: "modal".into(),
                property: "--z-index-modal".into(),
                shape: TokenCategory::ZIndex.shape(),
                fallback: TokenValue::uniform("1300"),
                origin: TokenOrigin::Base,
            },
            SchemaToken {
                category: TokenCategory::Color,
                name: "accent".into(),
                property: "--color-accent".into(),
                shape: TokenCategory::Color.shape(),
                fallback: TokenValue::per_mode("#258BD3", "#4497E4"),
                origin: TokenOrigin::Brand,
            },
        ])
    }

    #[test]
    fn z_index_accepts_integer_numbers() {
        let report = validate(&schema(), &json!({ "zIndex": { "modal": 2000 } }));
        assert_eq!(
            report.resolved.value("--z-index-modal", ThemeMode::Light),
            Some("2000")
        );
        let report = validate(&schema(), &json!({ "zIndex": { "modal": 1.5 } }));
        assert_eq!(
            report.resolved.value("--z-index-modal", ThemeMode::Light),
            Some("1300")
        );
        assert!(report.warnings.iter().any(|w| {
            w.kind == WarningKind::MalformedToken && w.path == "zIndex.modal"
        }));
    }

    #[test]
    fn color_given_as_string_is_malformed_at_token_path() {
        let report = validate(&schema(), &json!({ "color": { "accent": "#000" } }));
        assert_eq!(
            report.warnings.first(),
            Some(&ValidationWarning {
                kind: WarningKind::MalformedToken,
                path: "color.accent".into(),
                raw: Some(json!("#000")),
            })
        );
        assert_eq!(
            report.resolved.value("--color-accent", ThemeMode::Dark),
            Some("#4497E4")
        );
    }

    #[test]
    fn warning_kinds_have_stable_names() {
        assert_eq!(WarningKind::MissingToken.as_str(), "MissingToken");
        assert_eq!(WarningKind::UnknownToken.as_str(), "UnknownToken");
    }
}
