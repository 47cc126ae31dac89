use super::layer::{LanguageLayers, LanguageMap, LanguageRecord, normalize};
use super::policy::Policy;
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

const DEFAULT_SETTINGS_JSON: &str = include_str!("default_settings.json");

const LANGUAGES_KEY: &str = "languages";
const SUPPLIED_LANGUAGES_KEY: &str = "supplied_languages";

static BUILTIN_SCHEMA: LazyLock<SettingsSchema> = LazyLock::new(|| {
    SettingsSchema::from_json(DEFAULT_SETTINGS_JSON)
        .expect("built-in default_settings.json must be a valid settings schema")
});

/// Platform identifier used to pick the `*_<platform>` language lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Linux,
    Mac,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Platform::Windows,
            "linux" => Platform::Linux,
            "macos" => Platform::Mac,
            _ => Platform::Other,
        }
    }

    /// Suffix of the platform-specific keys, e.g. `languages_mac`
    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            Platform::Windows => Some("windows"),
            Platform::Linux => Some("linux"),
            Platform::Mac => Some("mac"),
            Platform::Other => None,
        }
    }

    fn key(&self, base: &str) -> Option<String> {
        self.suffix().map(|suffix| format!("{base}_{suffix}"))
    }
}

/// Scalar options that apply to the whole document
///
/// Per-language options here act as the last fallback for [`Language`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GlobalSettings {
    pub timeout: f64,
    pub extension: String,
    pub command: String,
    pub spacing: usize,
    pub minimalist: bool,
    pub stderr: Policy,
    pub newline: String,
    pub tab: String,
    pub run_blanks: bool,
    pub run_comments: bool,
    pub strip_argv: Policy,
    pub strip_stdin: Policy,
    pub strip_code: Policy,
    pub strip_output: Policy,
    pub show_runs: bool,
    pub show_stats: bool,
    pub show_equal: bool,
    pub show_errors: bool,
    pub show_time: bool,
    pub show_command: bool,
    pub show_code: bool,
    pub show_argv: bool,
    pub show_stdin: bool,
    pub show_output: bool,
}

/// Every recognized settings key with its default value
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSchema {
    values: Map<String, Value>,
    globals: GlobalSettings,
}

impl SettingsSchema {
    /// The schema compiled into the library
    pub fn builtin() -> &'static SettingsSchema {
        &BUILTIN_SCHEMA
    }

    /// Build a schema from a JSON object holding every recognized key
    pub fn from_json(json: &str) -> Result<Self> {
        let values = match serde_json::from_str::<Value>(json)? {
            Value::Object(values) => values,
            other => {
                return Err(Error::SettingsError(format!(
                    "settings schema must be a JSON object, not {}",
                    json_type_name(&other)
                )));
            }
        };
        let globals = serde_json::from_value(Value::Object(values.clone()))?;
        Ok(Self { values, globals })
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

/// A fully resolved view of one language
#[derive(Debug, Clone, PartialEq)]
pub struct Language {
    /// Display name, case preserved
    pub name: String,
    pub command: String,
    pub extension: String,
    pub timeout: f64,
    pub stderr: Policy,
    pub strip_code: Policy,
    pub strip_output: Policy,
    pub newline: String,
    pub tab: String,
    pub spacing: usize,
    pub show_time: bool,
    pub show_command: bool,
    pub show_code: bool,
    pub show_argv: bool,
    pub show_stdin: bool,
    pub show_output: bool,
}

impl Language {
    /// Fill the attributes a merged record leaves open from the global settings
    pub fn from_record(normalized: &str, record: LanguageRecord, globals: &GlobalSettings) -> Self {
        Self {
            name: record.name.unwrap_or_else(|| normalized.to_string()),
            command: record.command.unwrap_or_else(|| globals.command.clone()),
            extension: record.extension.unwrap_or_else(|| globals.extension.clone()),
            timeout: record.timeout.unwrap_or(globals.timeout),
            stderr: record.stderr.unwrap_or(globals.stderr),
            strip_code: record.strip_code.unwrap_or(globals.strip_code),
            strip_output: record.strip_output.unwrap_or(globals.strip_output),
            newline: record.newline.unwrap_or_else(|| globals.newline.clone()),
            tab: record.tab.unwrap_or_else(|| globals.tab.clone()),
            spacing: record.spacing.unwrap_or(globals.spacing),
            show_time: record.show_time.unwrap_or(globals.show_time),
            show_command: record.show_command.unwrap_or(globals.show_command),
            show_code: record.show_code.unwrap_or(globals.show_code),
            show_argv: record.show_argv.unwrap_or(globals.show_argv),
            show_stdin: record.show_stdin.unwrap_or(globals.show_stdin),
            show_output: record.show_output.unwrap_or(globals.show_output),
        }
    }
}

/// Resolved settings for one stretch of a document
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    globals: GlobalSettings,
    platform: Platform,
    languages: HashMap<String, Language>,
    language_names: Vec<String>,
}

impl Settings {
    /// Settings built from the built-in schema alone
    pub fn defaults() -> Self {
        Self::resolve(SettingsSchema::builtin(), &Map::new())
    }

    /// Resolve `overrides` against `schema` for the current platform
    pub fn resolve(schema: &SettingsSchema, overrides: &Map<String, Value>) -> Self {
        let (settings, issues) = Self::resolve_with_issues(schema, overrides, Platform::current());
        for issue in &issues {
            warn!("{}", issue);
        }
        settings
    }

    /// Resolve `overrides` against `schema`, returning every non-fatal issue found
    ///
    /// Keys missing from `overrides` take the schema value and keys unknown to the
    /// schema are ignored. A scalar of the wrong type makes every scalar fall back
    /// to the schema; a malformed language list falls back to the schema's list.
    pub fn resolve_with_issues(
        schema: &SettingsSchema,
        overrides: &Map<String, Value>,
        platform: Platform,
    ) -> (Self, Vec<String>) {
        let mut issues = Vec::new();

        let combined: Map<String, Value> = schema
            .values
            .iter()
            .map(|(key, default)| {
                let value = overrides.get(key).unwrap_or(default);
                (key.clone(), value.clone())
            })
            .collect();

        for key in overrides.keys().filter(|key| !schema.contains_key(key)) {
            debug!("Ignoring unrecognized settings key \"{}\"", key);
        }

        let globals = match serde_json::from_value::<GlobalSettings>(Value::Object(
            combined.clone(),
        )) {
            Ok(globals) => globals,
            Err(e) => {
                issues.push(format!(
                    "Issue combining settings \"{e}\". Something may be the wrong type. Using default settings."
                ));
                schema.globals.clone()
            }
        };

        let mut build_map = |key: Option<String>| -> LanguageMap {
            let Some(key) = key else {
                return LanguageMap::default();
            };
            let items = match combined.get(&key) {
                Some(Value::Array(items)) => items.clone(),
                Some(other) => {
                    issues.push(format!(
                        "\"{key}\" must be a list of languages, not {}. Using default \"{key}\".",
                        json_type_name(other)
                    ));
                    match schema.values.get(&key) {
                        Some(Value::Array(items)) => items.clone(),
                        _ => Vec::new(),
                    }
                }
                None => Vec::new(),
            };
            LanguageMap::from_values(&key, &items, &mut issues)
        };

        let layers = LanguageLayers {
            custom_platform: build_map(platform.key(LANGUAGES_KEY)),
            custom: build_map(Some(LANGUAGES_KEY.to_string())),
            supplied_platform: build_map(platform.key(SUPPLIED_LANGUAGES_KEY)),
            supplied: build_map(Some(SUPPLIED_LANGUAGES_KEY.to_string())),
        };

        let language_names = layers.names();
        let languages = language_names
            .iter()
            .filter_map(|name| {
                layers
                    .merged(name)
                    .map(|record| (name.clone(), Language::from_record(name, record, &globals)))
            })
            .collect();

        debug!(
            "Resolved settings for {:?} with {} languages",
            platform,
            language_names.len()
        );

        let settings = Self {
            globals,
            platform,
            languages,
            language_names,
        };
        (settings, issues)
    }

    pub fn globals(&self) -> &GlobalSettings {
        &self.globals
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Whether a language with this (not necessarily normalized) name is known
    pub fn contains(&self, name: &str) -> bool {
        self.languages.contains_key(&normalize(name))
    }

    /// Look up a resolved language by name
    pub fn language(&self, name: &str) -> Result<&Language> {
        self.languages
            .get(&normalize(name))
            .ok_or_else(|| Error::UnknownLanguage(name.trim().to_string()))
    }

    /// Normalized names of every known language
    pub fn language_names(&self) -> &[String] {
        &self.language_names
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
