use std::path::Path;

use tessera_tokens::defaults::{BASE_SOURCE_NAME, BRAND_SOURCE_NAME, base_source, brand_source};
use tessera_tokens::{TokenSource, check_artifacts, compile, write_artifacts};
use tracing::info;

use super::read_file;
use crate::cli::CompileArgs;
use crate::error::CliResult;
use crate::output::{CompileReport, OutputFormat, render_compile};

pub(crate) fn handle_compile(args: &CompileArgs, format: OutputFormat) -> CliResult<String> {
    let base = load_source(args.base.as_deref(), BASE_SOURCE_NAME, base_source)?;
    let brand = load_source(args.brand.as_deref(), BRAND_SOURCE_NAME, brand_source)?;
    let artifacts = compile(&base, &brand)?;

    let changed = if args.check {
        check_artifacts(&artifacts, &args.out)?;
        info!(out_dir = %args.out.display(), "token artifacts are current");
        Vec::new()
    } else {
        write_artifacts(&artifacts, &args.out)?
            .iter()
            .map(|path| path.display().to_string())
            .collect()
    };

    render_compile(
        &CompileReport {
            out_dir: args.out.display().to_string(),
            tokens: artifacts.schema.len(),
            checked: args.check,
            changed,
        },
        format,
    )
}

fn load_source(
    path: Option<&Path>,
    name: &str,
    built_in: fn() -> TokenSource,
) -> CliResult<TokenSource> {
    match path {
        Some(path) => Ok(TokenSource::from_json_str(name, &read_file(path)?)?),
        None => Ok(built_in()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tessera_tokens::output::{CSS_FILE, LOCK_FILE};

    fn args(out: PathBuf, check: bool) -> CompileArgs {
        CompileArgs {
            base: None,
            brand: None,
            out,
            check,
        }
    }

    #[test]
    fn check_fails_until_artifacts_are_written() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("tokens");

        let stale = handle_compile(&args(out.clone(), true), OutputFormat::Table);
        assert!(matches!(stale, Err(ref err) if err.exit_code() == 2));

        let written = handle_compile(&args(out.clone(), false), OutputFormat::Table)?;
        assert!(written.starts_with("wrote 5 file(s)"));
        assert!(out.join(CSS_FILE).is_file());
        assert!(out.join(LOCK_FILE).is_file());

        let checked = handle_compile(&args(out.clone(), true), OutputFormat::Table)?;
        assert!(checked.contains("up to date"));

        let rerun = handle_compile(&args(out, false), OutputFormat::Table)?;
        assert!(rerun.starts_with("no changes"));
        Ok(())
    }

    #[test]
    fn json_sources_replace_built_ins() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let base = dir.path().join("base.json");
        let brand = dir.path().join("brand.json");
        fs::write(&base, r#"{ "spacing": { "md": "12px" } }"#)?;
        fs::write(
            &brand,
            r##"{ "color": { "primary": { "light": "#10B981", "dark": "#34D399" } } }"##,
        )?;

        let report = handle_compile(
            &CompileArgs {
                base: Some(base),
                brand: Some(brand),
                out: dir.path().join("out"),
                check: false,
            },
            OutputFormat::Json,
        )?;
        let value: serde_json::Value = serde_json::from_str(&report)?;
        assert_eq!(value["tokens"], 2);
        Ok(())
    }

    #[test]
    fn malformed_source_is_a_validation_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let brand = dir.path().join("brand.json");
        fs::write(&brand, r#"{ "color": { "primary": "not-a-color" } }"#)?;

        let result = handle_compile(
            &CompileArgs {
                base: None,
                brand: Some(brand),
                out: dir.path().join("out"),
                check: false,
            },
            OutputFormat::Table,
        );
        assert!(matches!(result, Err(ref err) if err.exit_code() == 2));
        assert!(!dir.path().join("out").exists());
        Ok(())
    }
}
