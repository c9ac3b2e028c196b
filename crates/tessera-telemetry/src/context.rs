//! Process-level span for command-line entry points.

use tracing::{Span, span::Entered};

use crate::init::build_version;

/// Guard that keeps the command span entered for the lifetime of the process.
pub struct CommandContextGuard {
    _guard: Entered<'static>,
}

impl CommandContextGuard {
    /// Enter a `tessera` span tagged with the command name and build version.
    #[must_use]
    pub fn new(command: &str) -> Self {
        let span: &'static Span = Box::leak(Box::new(tracing::info_span!(
            "tessera",
            command = %command,
            version = %build_version()
        )));
        Self {
            _guard: span.enter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_enters_span_without_subscriber() {
        let guard = CommandContextGuard::new("compile");
        drop(guard);
    }
}
