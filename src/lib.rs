//! Shared fixtures for the workspace integration tests

use runmany_core::{Diagnostics, Platform, RunStatistics, Session, SettingsSource};
use serde_json::Value;

/// Settings object from a `json!` value
pub fn settings(value: Value) -> SettingsSource {
    match value {
        Value::Object(map) => SettingsSource::Object(map),
        other => SettingsSource::Json(other.to_string()),
    }
}

/// Outcome of running a document in a captured session
pub struct Report {
    pub text: String,
    pub stats: RunStatistics,
    pub diagnostics: Vec<String>,
}

impl Report {
    /// The line of the report following the first line equal to `line`
    pub fn line_after(&self, line: &str) -> Option<&str> {
        let mut lines = self.text.lines();
        lines.find(|l| *l == line)?;
        lines.next()
    }
}

/// Run `document` on Linux settings with diagnostics captured instead of printed
pub fn run(document: &str, settings: Option<SettingsSource>) -> Report {
    let mut session = Session::new()
        .with_platform(Platform::Linux)
        .with_diagnostics(Diagnostics::captured());
    if let Some(settings) = settings {
        session = session.with_settings(settings);
    }
    let mut out = Vec::new();
    let stats = session.run(document, &mut out).expect("document should run");
    Report {
        text: String::from_utf8(out).expect("report should be UTF-8"),
        stats,
        diagnostics: session.diagnostics().messages().to_vec(),
    }
}
