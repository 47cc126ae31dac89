//! runmany - run code snippets written in many languages from one document
//!
//! This crate provides functionality to:
//! - Parse .many documents into settings, argv, stdin and code sections
//! - Resolve layered per-language settings for the current platform
//! - Run every snippet through its language's command and report the results
pub mod command;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod parser;
pub mod runner;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use config::{Language, Platform, Policy, Settings, SettingsSchema, SettingsSource};
pub use diagnostics::Diagnostics;
pub use error::{Error, Result};
pub use runner::{RunOutcome, RunStatistics};
pub use session::Session;

use std::io::Write;

/// Run `document`, writing the report to `out`
///
/// With `settings` given, embedded `Settings:` sections are ignored.
/// Problems in the document are echoed to stderr when `show_errors` is on.
pub fn run_many(
    document: &str,
    settings: Option<SettingsSource>,
    out: impl Write,
) -> Result<RunStatistics> {
    let mut session = Session::new();
    if let Some(settings) = settings {
        session = session.with_settings(settings);
    }
    session.run(document, out)
}

/// Run `document` and return the report
pub fn run_many_to_string(document: &str, settings: Option<SettingsSource>) -> Result<String> {
    let mut out = Vec::new();
    run_many(document, settings, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}
