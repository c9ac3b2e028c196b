//! CLI error type separating bad input from operational failures.

use std::fmt::{self, Display, Formatter};

use tessera_theme::ThemeError;
use tessera_tokens::TokenError;

/// Validation errors exit with 2, operational failures with 3.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<TokenError> for CliError {
    fn from(error: TokenError) -> Self {
        let message = format!("{error}: {}", error.detail());
        match error {
            TokenError::Io { .. } | TokenError::Encode { .. } => {
                Self::Failure(anyhow::Error::new(error).context(message))
            }
            _ => Self::Validation(message),
        }
    }
}

impl From<ThemeError> for CliError {
    fn from(error: ThemeError) -> Self {
        let message = format!("{error}: {}", error.detail());
        match error {
            ThemeError::InvalidBrandId { .. } | ThemeError::InvalidConfig { .. } => {
                Self::Validation(message)
            }
            _ => Self::Failure(anyhow::Error::new(error).context(message)),
        }
    }
}
