use anyhow::anyhow;
use serde_json::Value;
use tessera_theme::validate;

use super::{load_schema, read_file};
use crate::cli::ValidateArgs;
use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, ThemeReport, render_theme};

pub(crate) fn handle_validate(args: &ValidateArgs, format: OutputFormat) -> CliResult<String> {
    let schema = load_schema(args.schema.as_deref())?;
    let payload: Value = serde_json::from_str(&read_file(&args.payload)?).map_err(|err| {
        CliError::failure(anyhow!(
            "payload {} is not valid JSON: {err}",
            args.payload.display()
        ))
    })?;

    let report = validate(&schema, &payload);
    render_theme(
        &ThemeReport {
            brand: None,
            status: None,
            mode: args.mode,
            properties: report.resolved.properties(args.mode),
            warnings: report.warnings,
        },
        format,
    )
}
