//! Brand identifiers.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::error::{ThemeError, ThemeResult};

/// Longest accepted brand identifier.
pub const MAX_BRAND_ID_LEN: usize = 64;

/// Validated brand identifier, safe to embed in a URL path or file name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BrandId(String);

impl BrandId {
    /// Validate `value` as `[a-z0-9][a-z0-9_-]*`.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::InvalidBrandId`] for empty, overlong, or non-conforming
    /// identifiers.
    pub fn parse(value: &str) -> ThemeResult<Self> {
        let invalid = |reason| ThemeError::InvalidBrandId {
            value: value.to_string(),
            reason,
        };
        let mut chars = value.chars();
        let Some(first) = chars.next() else {
            return Err(invalid("empty identifier"));
        };
        if value.len() > MAX_BRAND_ID_LEN {
            return Err(invalid("identifier too long"));
        }
        if !(first.is_ascii_lowercase() || first.is_ascii_digit()) {
            return Err(invalid("must start with a lowercase letter or digit"));
        }
        if !chars.all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '-' | '_'))
        {
            return Err(invalid("only lowercase letters, digits, '-' and '_' are allowed"));
        }
        Ok(Self(value.to_string()))
    }

    /// Identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BrandId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
