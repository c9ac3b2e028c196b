//! Command handlers and the file helpers they share.

mod compile;
mod preview;
mod validate;

use std::fs;
use std::path::Path;

use anyhow::Context;
use tessera_tokens::defaults::{base_source, brand_source};
use tessera_tokens::{BrandThemeSchema, compile};

use crate::error::{CliError, CliResult};

pub(crate) use compile::handle_compile;
pub(crate) use preview::handle_preview;
pub(crate) use validate::handle_validate;

fn read_file(path: &Path) -> CliResult<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))
        .map_err(CliError::failure)
}

/// Schema from a compiled `schema.json`, or compiled from the built-in sources.
fn load_schema(path: Option<&Path>) -> CliResult<BrandThemeSchema> {
    match path {
        Some(path) => Ok(BrandThemeSchema::from_json_str(&read_file(path)?)?),
        None => Ok(compile(&base_source(), &brand_source())?.schema),
    }
}
