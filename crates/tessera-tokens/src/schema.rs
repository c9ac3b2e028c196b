//! Serializable brand theme schema.
//!
//! # Design
//! - Produced by the compiler and loaded by the runtime without compiling again.
//! - Tokens are kept sorted by category, then name, so lookups can binary search.
//! - Carries a format version; documents with another version are rejected.

use serde::{Deserialize, Serialize};

use crate::error::{TokenError, TokenResult};
use crate::model::{TokenCategory, TokenValue};
use crate::shape::ValueShape;

/// Current schema document version.
pub const SCHEMA_VERSION: u32 = 1;

/// Which source declared a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenOrigin {
    /// Declared by the base source.
    Base,
    /// Declared by the brand source.
    Brand,
}

/// Schema entry for a single token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaToken {
    /// Token category.
    pub category: TokenCategory,
    /// Token name, unique within its category.
    pub name: String,
    /// Custom-property name written on the scoping root.
    pub property: String,
    /// Expected value shape.
    pub shape: ValueShape,
    /// Compiled fallback.
    pub fallback: TokenValue,
    /// Source that declared the token.
    pub origin: TokenOrigin,
}

/// Tokens a brand payload may override, with their fallbacks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandThemeSchema {
    version: u32,
    tokens: Vec<SchemaToken>,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

impl BrandThemeSchema {
    /// Build a schema from tokens in any order.
    #[must_use]
    pub fn new(mut tokens: Vec<SchemaToken>) -> Self {
        tokens.sort_by(|a, b| (a.category, &a.name).cmp(&(b.category, &b.name)));
        Self {
            version: SCHEMA_VERSION,
            tokens,
        }
    }

    /// Decode a schema document.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::SchemaVersion`] for a document written by another format
    /// version and [`TokenError::SchemaDecode`] for malformed documents.
    pub fn from_json_str(text: &str) -> TokenResult<Self> {
        let probe: VersionProbe =
            serde_json::from_str(text).map_err(|source| TokenError::SchemaDecode { source })?;
        if probe.version != SCHEMA_VERSION {
            return Err(TokenError::SchemaVersion {
                found: probe.version,
                expected: SCHEMA_VERSION,
            });
        }
        let decoded: Self =
            serde_json::from_str(text).map_err(|source| TokenError::SchemaDecode { source })?;
        Ok(Self::new(decoded.tokens))
    }

    /// Encode the schema as pretty JSON with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Encode`] if serialization fails.
    pub fn to_json(&self) -> TokenResult<String> {
        let mut text = serde_json::to_string_pretty(self).map_err(|source| TokenError::Encode {
            artifact: "schema",
            source,
        })?;
        text.push('\n');
        Ok(text)
    }

    /// Document format version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Look up a token by category and name.
    #[must_use]
    pub fn get(&self, category: TokenCategory, name: &str) -> Option<&SchemaToken> {
        self.tokens
            .binary_search_by(|token| (token.category, token.name.as_str()).cmp(&(category, name)))
            .ok()
            .map(|index| &self.tokens[index])
    }

    /// Tokens of a single category, ordered by name.
    pub fn category(&self, category: TokenCategory) -> impl Iterator<Item = &SchemaToken> {
        self.tokens
            .iter()
            .filter(move |token| token.category == category)
    }

    /// All tokens ordered by category, then name.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaToken> {
        self.tokens.iter()
    }

    /// Number of tokens.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the schema has no tokens.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
