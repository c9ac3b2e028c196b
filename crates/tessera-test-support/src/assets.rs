//! On-disk brand asset layout helpers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

/// Path of a bundled brand payload: `<root>/<scope>/themes/<brand>.json`.
#[must_use]
pub fn brand_asset_path(root: &Path, scope: &str, brand: &str) -> PathBuf {
    root.join(scope).join("themes").join(format!("{brand}.json"))
}

/// Write `payload` where a directory fetcher expects to find `brand`.
///
/// # Errors
///
/// Returns an error if the directories or the file cannot be written.
pub fn write_brand_asset(
    root: &Path,
    scope: &str,
    brand: &str,
    payload: &Value,
) -> io::Result<PathBuf> {
    write_raw_brand_asset(root, scope, brand, &payload.to_string())
}

/// Write raw bytes as a brand payload, for decode-failure tests.
///
/// # Errors
///
/// Returns an error if the directories or the file cannot be written.
pub fn write_raw_brand_asset(
    root: &Path,
    scope: &str,
    brand: &str,
    contents: &str,
) -> io::Result<PathBuf> {
    let path = brand_asset_path(root, scope, brand);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, contents)?;
    Ok(path)
}
