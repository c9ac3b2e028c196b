//! Output renderers for CLI commands.
//!
//! Renderers return the text instead of printing so handlers stay testable; `cli.rs`
//! writes the result to stdout.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::anyhow;
use clap::ValueEnum;
use serde::Serialize;
use tessera_theme::ValidationWarning;
use tessera_tokens::ThemeMode;

use crate::error::{CliError, CliResult};

/// Output format for commands that render structured data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Outcome of `tessera compile`.
#[derive(Debug, Serialize)]
pub(crate) struct CompileReport {
    pub(crate) out_dir: String,
    pub(crate) tokens: usize,
    pub(crate) checked: bool,
    pub(crate) changed: Vec<String>,
}

/// Resolved properties plus the warnings that produced them.
#[derive(Debug, Serialize)]
pub(crate) struct ThemeReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) status: Option<&'static str>,
    pub(crate) mode: ThemeMode,
    pub(crate) properties: BTreeMap<String, String>,
    pub(crate) warnings: Vec<ValidationWarning>,
}

fn to_json<T: Serialize>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

pub(crate) fn render_compile(report: &CompileReport, format: OutputFormat) -> CliResult<String> {
    if format == OutputFormat::Json {
        return to_json(report);
    }
    let mut text = String::new();
    if report.checked {
        let _ = writeln!(
            text,
            "artifacts in {} are up to date ({} tokens)",
            report.out_dir, report.tokens
        );
    } else if report.changed.is_empty() {
        let _ = writeln!(
            text,
            "no changes in {} ({} tokens)",
            report.out_dir, report.tokens
        );
    } else {
        let _ = writeln!(
            text,
            "wrote {} file(s) to {} ({} tokens)",
            report.changed.len(),
            report.out_dir,
            report.tokens
        );
        for path in &report.changed {
            let _ = writeln!(text, "  {path}");
        }
    }
    Ok(text)
}

pub(crate) fn render_theme(report: &ThemeReport, format: OutputFormat) -> CliResult<String> {
    if format == OutputFormat::Json {
        return to_json(report);
    }
    let mut text = String::new();
    if let Some(brand) = &report.brand {
        let _ = writeln!(text, "brand: {brand}");
    }
    if let Some(status) = report.status {
        let _ = writeln!(text, "status: {status}");
    }
    let _ = writeln!(text, "mode: {}", report.mode);

    let width = report
        .properties
        .keys()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max("PROPERTY".len());
    let _ = writeln!(text, "{:<width$} VALUE", "PROPERTY");
    for (name, value) in &report.properties {
        let _ = writeln!(text, "{name:<width$} {value}");
    }

    if report.warnings.is_empty() {
        let _ = writeln!(text, "warnings: none");
    } else {
        let _ = writeln!(text, "warnings:");
        for warning in &report.warnings {
            let raw = warning
                .raw
                .as_ref()
                .map_or_else(String::new, |raw| format!(" ({raw})"));
            let _ = writeln!(text, "  {:<14} {}{raw}", warning.kind.as_str(), warning.path);
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tessera_theme::WarningKind;

    fn report() -> ThemeReport {
        ThemeReport {
            brand: Some("acme".into()),
            status: Some("applied"),
            mode: ThemeMode::Dark,
            properties: BTreeMap::from([
                ("--color-primary".to_string(), "#FF5555".to_string()),
                ("--spacing-md".to_string(), "14px".to_string()),
            ]),
            warnings: vec![ValidationWarning {
                kind: WarningKind::MalformedToken,
                path: "color.primary.light".into(),
                raw: Some(Value::from("#12")),
            }],
        }
    }

    #[test]
    fn theme_table_lists_properties_and_warnings() -> Result<(), Box<dyn std::error::Error>> {
        let text = render_theme(&report(), OutputFormat::Table)?;
        assert!(text.starts_with("brand: acme\nstatus: applied\nmode: dark\n"));
        assert!(text.contains("--color-primary #FF5555\n"));
        assert!(text.contains("  MalformedToken color.primary.light (\"#12\")\n"));
        Ok(())
    }

    #[test]
    fn theme_json_is_machine_readable() -> Result<(), Box<dyn std::error::Error>> {
        let value: Value = serde_json::from_str(&render_theme(&report(), OutputFormat::Json)?)?;
        assert_eq!(value["mode"], "dark");
        assert_eq!(value["properties"]["--spacing-md"], "14px");
        assert_eq!(value["warnings"][0]["kind"], "malformedToken");
        Ok(())
    }

    #[test]
    fn compile_table_lists_changed_files() -> Result<(), Box<dyn std::error::Error>> {
        let text = render_compile(
            &CompileReport {
                out_dir: "dist".into(),
                tokens: 4,
                checked: false,
                changed: vec!["dist/tokens.css".into()],
            },
            OutputFormat::Table,
        )?;
        assert_eq!(text, "wrote 1 file(s) to dist (4 tokens)\n  dist/tokens.css\n");
        Ok(())
    }
}
