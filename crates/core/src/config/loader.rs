//! Loading override documents from JSON text, JSON values and files
//!
//! An override document is a JSON object. Its text may instead be a JSON
//! string, which names a file holding the document; such references are
//! followed up to [`MAX_REFERENCE_DEPTH`] times. Every failure is reported and
//! yields an empty document, so the schema defaults apply.

use super::settings::json_type_name;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Maximum depth of file references to prevent reference cycles
const MAX_REFERENCE_DEPTH: usize = 10;

/// Where caller-provided settings come from
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsSource {
    /// An already parsed JSON object
    Object(Map<String, Value>),
    /// JSON text: an object, or a string holding a path to a JSON file
    Json(String),
    /// Path to a JSON file
    File(PathBuf),
}

impl SettingsSource {
    /// Load the override document, describing any problem in `issues`
    pub fn load(&self, issues: &mut Vec<String>) -> Map<String, Value> {
        match self {
            SettingsSource::Object(map) => map.clone(),
            SettingsSource::Json(text) => parse_settings_text(text, issues),
            SettingsSource::File(path) => load_settings_file(path, issues, 0),
        }
    }
}

impl From<Map<String, Value>> for SettingsSource {
    fn from(map: Map<String, Value>) -> Self {
        SettingsSource::Object(map)
    }
}

/// Parse the text of an embedded `Settings:` section or a settings argument
pub fn parse_settings_text(text: &str, issues: &mut Vec<String>) -> Map<String, Value> {
    let text = text.trim();
    if text.is_empty() {
        return Map::new();
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value) => from_value(value, issues, 0),
        Err(e) => {
            issues.push(format!("Settings JSON issue \"{e}\". Using default settings."));
            Map::new()
        }
    }
}

fn from_value(value: Value, issues: &mut Vec<String>, depth: usize) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::String(path) if path.trim().is_empty() => Map::new(),
        Value::String(path) => load_settings_file(Path::new(&path), issues, depth + 1),
        Value::Null => Map::new(),
        other => {
            issues.push(format!(
                "Settings JSON must be an object or a file path string, not {}. Using default settings.",
                json_type_name(&other)
            ));
            Map::new()
        }
    }
}

fn load_settings_file(path: &Path, issues: &mut Vec<String>, depth: usize) -> Map<String, Value> {
    if depth > MAX_REFERENCE_DEPTH {
        issues.push(format!(
            "Settings file references nested deeper than {MAX_REFERENCE_DEPTH} at \"{}\". Using default settings.",
            path.display()
        ));
        return Map::new();
    }
    debug!("Loading settings file {:?}", path);
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            issues.push(format!(
                "Settings file issue \"{e}\" for \"{}\". Using default settings.",
                path.display()
            ));
            return Map::new();
        }
    };
    match serde_json::from_str::<Value>(&contents) {
        Ok(value) => from_value(value, issues, depth),
        Err(e) => {
            issues.push(format!(
                "Settings file issue \"{e}\" for \"{}\". Using default settings.",
                path.display()
            ));
            Map::new()
        }
    }
}
