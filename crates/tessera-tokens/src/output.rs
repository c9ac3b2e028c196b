//! Artifact files and the deterministic lock file.
//!
//! # Design
//! - Renders every artifact in memory first, then writes; nothing touches disk when
//!   rendering fails.
//! - Files are rewritten only when their contents change, so repeated runs leave
//!   timestamps alone.
//! - `ARTIFACT_LOCK.txt` records the SHA-256 of each artifact for review diffs.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::info;

use crate::compiler::CompiledArtifacts;
use crate::error::{TokenError, TokenResult};

/// Custom-property sheet file name.
pub const CSS_FILE: &str = "tokens.css";
/// Preset file name.
pub const PRESET_FILE: &str = "preset.json";
/// Schema file name.
pub const SCHEMA_FILE: &str = "schema.json";
/// Utility stylesheet file name.
pub const UTILITIES_FILE: &str = "utilities.css";
/// Lock file name.
pub const LOCK_FILE: &str = "ARTIFACT_LOCK.txt";

/// A rendered artifact ready to be written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactFile {
    /// File name relative to the output directory.
    pub name: &'static str,
    /// Full file contents.
    pub contents: String,
}

impl CompiledArtifacts {
    /// Render every artifact, lock file last.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Encode`] if the preset or schema cannot be serialized.
    pub fn files(&self) -> TokenResult<Vec<ArtifactFile>> {
        let mut files = vec![
            ArtifactFile {
                name: PRESET_FILE,
                contents: self.preset.to_json()?,
            },
            ArtifactFile {
                name: SCHEMA_FILE,
                contents: self.schema.to_json()?,
            },
            ArtifactFile {
                name: CSS_FILE,
                contents: self.css_sheet.clone(),
            },
            ArtifactFile {
                name: UTILITIES_FILE,
                contents: self.preset.render_utilities_css(),
            },
        ];
        let lock = lock_contents(&files);
        files.push(ArtifactFile {
            name: LOCK_FILE,
            contents: lock,
        });
        Ok(files)
    }
}

/// Write all artifacts into `out_dir`, returning the paths whose contents changed.
///
/// # Errors
///
/// Returns [`TokenError::Encode`] when rendering fails and [`TokenError::Io`] when the
/// directory or a file cannot be written.
pub fn write_artifacts(artifacts: &CompiledArtifacts, out_dir: &Path) -> TokenResult<Vec<PathBuf>> {
    let files = artifacts.files()?;
    fs::create_dir_all(out_dir).map_err(|source| TokenError::Io {
        operation: "create_dir",
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut changed = Vec::new();
    for file in files {
        let path = out_dir.join(file.name);
        if read_existing(&path)?.as_deref() == Some(file.contents.as_str()) {
            continue;
        }
        fs::write(&path, &file.contents).map_err(|source| TokenError::Io {
            operation: "write",
            path: path.clone(),
            source,
        })?;
        changed.push(path);
    }
    info!(
        out_dir = %out_dir.display(),
        changed = changed.len(),
        "wrote token artifacts"
    );
    Ok(changed)
}

/// Verify that `out_dir` holds exactly the freshly rendered artifacts.
///
/// # Errors
///
/// Returns [`TokenError::Stale`] listing every missing or differing file,
/// [`TokenError::Encode`] when rendering fails, and [`TokenError::Io`] for unreadable
/// files.
pub fn check_artifacts(artifacts: &CompiledArtifacts, out_dir: &Path) -> TokenResult<()> {
    let mut stale = Vec::new();
    for file in artifacts.files()? {
        let path = out_dir.join(file.name);
        if read_existing(&path)?.as_deref() != Some(file.contents.as_str()) {
            stale.push(path);
        }
    }
    if stale.is_empty() {
        Ok(())
    } else {
        Err(TokenError::Stale { paths: stale })
    }
}

/// Lowercase hex SHA-256 digest of `contents`.
#[must_use]
pub fn sha256_hex(contents: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    format!("{:x}", hasher.finalize())
}

fn lock_contents(files: &[ArtifactFile]) -> String {
    files
        .iter()
        .map(|file| format!("{} sha256 {}\n", file.name, sha256_hex(file.contents.as_bytes())))
        .collect()
}

fn read_existing(path: &Path) -> TokenResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(TokenError::Io {
            operation: "read",
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_matches_known_digest() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn lock_lists_each_artifact_once() {
        let files = vec![
            ArtifactFile {
                name: CSS_FILE,
                contents: "a".into(),
            },
            ArtifactFile {
                name: SCHEMA_FILE,
                contents: "b".into(),
            },
        ];
        let lock = lock_contents(&files);
        assert_eq!(lock.lines().count(), 2);
        assert!(lock.starts_with("tokens.css sha256 "));
    }
}
