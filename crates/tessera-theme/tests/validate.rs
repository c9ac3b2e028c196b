use std::error::Error;

use serde_json::{Value, json};
use tessera_test_support::fixtures::{
    PRIMARY_DARK, PRIMARY_LIGHT, RAISED_SHADOW, light_primary_payload, scenario_schema,
};
use tessera_theme::{ValidationWarning, WarningKind, validate};
use tessera_tokens::{
    BrandThemeSchema, ThemeMode, TokenCategory, TokenSource, TokenValue, compile,
};

type TestResult = Result<(), Box<dyn Error>>;

fn primary_and_shadow_schema() -> Result<BrandThemeSchema, Box<dyn Error>> {
    let base = TokenSource::new("base").with_token(
        TokenCategory::Shadow,
        "raised",
        TokenValue::uniform(RAISED_SHADOW),
    );
    let brand = TokenSource::new("brand").with_token(
        TokenCategory::Color,
        "primary",
        TokenValue::per_mode(PRIMARY_LIGHT, PRIMARY_DARK),
    );
    Ok(compile(&base, &brand)?.schema)
}

fn summary(warnings: &[ValidationWarning]) -> Vec<(WarningKind, &str)> {
    warnings
        .iter()
        .map(|warning| (warning.kind, warning.path.as_str()))
        .collect()
}

#[test]
fn partial_payload_keeps_fallbacks_for_missing_values() -> TestResult {
    let schema = primary_and_shadow_schema()?;
    let report = validate(&schema, &light_primary_payload());

    assert_eq!(
        summary(&report.warnings),
        [
            (WarningKind::MissingToken, "color.primary.dark"),
            (WarningKind::MissingToken, "shadow.raised"),
        ]
    );
    let resolved = &report.resolved;
    assert_eq!(
        resolved.value("--color-primary", ThemeMode::Light),
        Some("#00AA55")
    );
    assert_eq!(
        resolved.value("--color-primary", ThemeMode::Dark),
        Some(PRIMARY_DARK)
    );
    assert_eq!(
        resolved.value("--shadow-raised", ThemeMode::Light),
        Some(RAISED_SHADOW)
    );
    Ok(())
}

#[test]
fn empty_payload_resolves_every_token_to_its_fallback() -> TestResult {
    let schema = scenario_schema()?;
    let report = validate(&schema, &json!({}));

    assert_eq!(report.resolved.len(), schema.len());
    for token in schema.iter() {
        for mode in ThemeMode::ALL {
            assert_eq!(
                report.resolved.value(&token.property, mode),
                Some(token.fallback.for_mode(mode))
            );
        }
    }
    assert!(
        report
            .warnings
            .iter()
            .all(|warning| warning.kind == WarningKind::MissingToken)
    );
    // Two color modes plus three uniform tokens.
    assert_eq!(report.warnings.len(), 5);
    Ok(())
}

#[test]
fn non_object_root_is_one_malformed_warning() -> TestResult {
    let schema = scenario_schema()?;
    let report = validate(&schema, &json!(["not", "a", "theme"]));

    assert_eq!(summary(&report.warnings), [(WarningKind::MalformedToken, "$")]);
    assert_eq!(report.resolved, validate(&schema, &json!({})).resolved);
    Ok(())
}

#[test]
fn non_object_category_is_malformed_once() -> TestResult {
    let schema = primary_and_shadow_schema()?;
    let payload = json!({ "color": "#FFFFFF", "shadow": { "raised": "none" } });
    let report = validate(&schema, &payload);

    assert_eq!(summary(&report.warnings), [(WarningKind::MalformedToken, "color")]);
    assert_eq!(report.warnings[0].raw, Some(Value::from("#FFFFFF")));
    assert_eq!(
        report.resolved.value("--shadow-raised", ThemeMode::Dark),
        Some("none")
    );
    Ok(())
}

#[test]
fn malformed_values_keep_fallbacks_and_raw_input() -> TestResult {
    let schema = primary_and_shadow_schema()?;
    let payload = json!({
        "color": { "primary": { "light": "#12", "dark": 7 } },
        "shadow": { "raised": "0 1px red; background: url(x)" }
    });
    let report = validate(&schema, &payload);

    assert_eq!(
        summary(&report.warnings),
        [
            (WarningKind::MalformedToken, "color.primary.light"),
            (WarningKind::MalformedToken, "color.primary.dark"),
            (WarningKind::MalformedToken, "shadow.raised"),
        ]
    );
    assert_eq!(report.warnings[0].raw, Some(Value::from("#12")));
    assert_eq!(report.warnings[1].raw, Some(Value::from(7)));
    assert_eq!(
        report.resolved.value("--color-primary", ThemeMode::Light),
        Some(PRIMARY_LIGHT)
    );
    assert_eq!(
        report.resolved.value("--shadow-raised", ThemeMode::Light),
        Some(RAISED_SHADOW)
    );
    Ok(())
}

#[test]
fn unknown_keys_are_reported_after_schema_findings() -> TestResult {
    let schema = primary_and_shadow_schema()?;
    let payload = json!({
        "color": {
            "primary": { "light": "#101010", "dark": "#202020", "dim": "#303030" },
            "tertiary": { "light": "#000", "dark": "#fff" }
        },
        "shadow": { "raised": "none" },
        "radius": { "md": "8px" },
        "gradient": {}
    });
    let report = validate(&schema, &payload);

    assert_eq!(
        summary(&report.warnings),
        [
            (WarningKind::UnknownToken, "color.primary.dim"),
            (WarningKind::UnknownToken, "color.tertiary"),
            (WarningKind::UnknownToken, "gradient"),
            (WarningKind::UnknownToken, "radius"),
        ]
    );
    assert_eq!(
        report.resolved.value("--color-primary", ThemeMode::Dark),
        Some("#202020")
    );
    Ok(())
}
