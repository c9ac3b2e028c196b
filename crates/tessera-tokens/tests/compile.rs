use std::error::Error;
use std::fs;

use tessera_tokens::defaults::{base_source, brand_source};
use tessera_tokens::output::{CSS_FILE, LOCK_FILE, SCHEMA_FILE, sha256_hex};
use tessera_tokens::{
    BrandThemeSchema, TokenCategory, TokenError, TokenSource, TokenValue, check_artifacts,
    compile, write_artifacts,
};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn compilation_is_byte_stable() -> TestResult {
    let first = compile(&base_source(), &brand_source())?;
    let second = compile(&base_source(), &brand_source())?;
    assert_eq!(first, second);

    let first_files = first.files()?;
    let second_files = second.files()?;
    assert_eq!(first_files, second_files);
    Ok(())
}

#[test]
fn declaration_order_does_not_change_output() -> TestResult {
    let forward = TokenSource::new("base")
        .with_token(TokenCategory::Spacing, "sm", TokenValue::uniform("8px"))
        .with_token(TokenCategory::Animation, "fast", TokenValue::uniform("100ms linear"));
    let reverse = TokenSource::new("base")
        .with_token(TokenCategory::Animation, "fast", TokenValue::uniform("100ms linear"))
        .with_token(TokenCategory::Spacing, "sm", TokenValue::uniform("8px"));
    let brand = brand_source();
    assert_eq!(
        compile(&forward, &brand)?.files()?,
        compile(&reverse, &brand)?.files()?
    );
    Ok(())
}

#[test]
fn json_sources_compile_like_built_ins() -> TestResult {
    let base = TokenSource::from_json_str(
        "base",
        r#"{ "shadow": { "raised": "0 1px 2px rgba(0,0,0,.2)" } }"#,
    )?;
    let brand = TokenSource::from_json_str(
        "brand",
        r##"{ "color": { "primary": { "light": "#10B981", "dark": "#34D399" } } }"##,
    )?;
    let artifacts = compile(&base, &brand)?;
    let css = &artifacts.css_sheet;
    assert!(css.contains(":root {\n  --shadow-raised: 0 1px 2px rgba(0,0,0,.2);\n}"));
    assert!(css.contains("[data-theme=\"dark\"] {\n  --color-primary: #34D399;\n}"));
    Ok(())
}

#[test]
fn written_artifacts_pass_check_and_detect_drift() -> TestResult {
    let dir = tempfile::tempdir()?;
    let artifacts = compile(&base_source(), &brand_source())?;

    let changed = write_artifacts(&artifacts, dir.path())?;
    assert_eq!(changed.len(), 5);
    check_artifacts(&artifacts, dir.path())?;

    let unchanged = write_artifacts(&artifacts, dir.path())?;
    assert!(unchanged.is_empty());

    let css = fs::read_to_string(dir.path().join(CSS_FILE))?;
    let lock = fs::read_to_string(dir.path().join(LOCK_FILE))?;
    assert!(lock.contains(&format!("tokens.css sha256 {}", sha256_hex(css.as_bytes()))));

    let schema_text = fs::read_to_string(dir.path().join(SCHEMA_FILE))?;
    let schema = BrandThemeSchema::from_json_str(&schema_text)?;
    assert_eq!(schema, artifacts.schema);

    fs::write(dir.path().join(CSS_FILE), "/* edited */\n")?;
    match check_artifacts(&artifacts, dir.path()) {
        Err(TokenError::Stale { paths }) => {
            assert_eq!(paths, vec![dir.path().join(CSS_FILE)]);
        }
        other => panic!("expected stale artifacts, got {other:?}"),
    }
    Ok(())
}

#[test]
fn errors_block_every_artifact() -> TestResult {
    let dir = tempfile::tempdir()?;
    let brand =
        brand_source().with_token(TokenCategory::Font, "raised", TokenValue::uniform("Inter"));
    let outcome = compile(&base_source(), &brand)
        .and_then(|artifacts| write_artifacts(&artifacts, dir.path()));
    assert!(matches!(outcome, Err(TokenError::DuplicateToken { .. })));
    assert_eq!(fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}
