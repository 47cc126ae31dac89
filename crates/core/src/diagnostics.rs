//! User-facing diagnostics for recoverable problems in a document or its settings.
//!
//! Every skipped line, dropped language record or unknown language ends up here.
//! Whether a message is surfaced depends on the `show_errors` value of the settings
//! in effect where the problem occurred, so callers flip [`Diagnostics::set_enabled`]
//! as they move through the document.

use tracing::debug;

/// Sink for non-fatal problems, owned by a session and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    enabled: bool,
    echo: bool,
    messages: Vec<String>,
}

impl Diagnostics {
    /// Diagnostics that are recorded and echoed to stderr
    pub fn new() -> Self {
        Self {
            enabled: true,
            echo: true,
            messages: Vec::new(),
        }
    }

    /// Diagnostics that are only recorded, never printed
    pub fn captured() -> Self {
        Self {
            echo: false,
            ..Self::new()
        }
    }

    /// Diagnostics that drop everything
    pub fn silent() -> Self {
        Self {
            enabled: false,
            echo: false,
            messages: Vec::new(),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Report a problem. Nothing is emitted while disabled.
    pub fn report(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.enabled {
            debug!("suppressed diagnostic: {}", message);
            return;
        }
        if self.echo {
            eprintln!("%%% RunMany Error: {message} %%%");
        }
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_diagnostics_emit_nothing() {
        let mut diagnostics = Diagnostics::captured();
        diagnostics.report("first");
        diagnostics.set_enabled(false);
        diagnostics.report("second");
        diagnostics.set_enabled(true);
        diagnostics.report("third");

        assert_eq!(diagnostics.messages(), ["first", "third"]);
    }

    #[test]
    fn test_silent_diagnostics() {
        let mut diagnostics = Diagnostics::silent();
        diagnostics.report("ignored");
        assert!(diagnostics.messages().is_empty());
        assert!(!diagnostics.is_enabled());
    }
}
