//! Language definition layers for cascading overrides
//!
//! A language can be described in up to four lists: custom or supplied, each
//! either generic or specific to the current platform. Each list becomes a
//! [`LanguageMap`], and a name's records are applied on top of each other from
//! the least to the most specific.

use super::policy::Policy;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Normalize a language name: trimmed and lowercased
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// One `{name, command, ...}` record from a language list
///
/// Every attribute is optional; missing ones fall through to lower layers and
/// finally to the global settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LanguageRecord {
    pub name: Option<String>,
    pub command: Option<String>,
    pub extension: Option<String>,
    pub timeout: Option<f64>,
    pub stderr: Option<Policy>,
    pub strip_code: Option<Policy>,
    pub strip_output: Option<Policy>,
    pub newline: Option<String>,
    pub tab: Option<String>,
    pub spacing: Option<usize>,
    pub show_time: Option<bool>,
    pub show_command: Option<bool>,
    pub show_code: Option<bool>,
    pub show_argv: Option<bool>,
    pub show_stdin: Option<bool>,
    pub show_output: Option<bool>,
}

macro_rules! override_fields {
    ($base:expr, $other:expr, $($field:ident),+ $(,)?) => {
        $(
            if $other.$field.is_some() {
                $base.$field = $other.$field.clone();
            }
        )+
    };
}

impl LanguageRecord {
    /// Apply a more specific record on top of this one
    pub fn apply(&mut self, other: &LanguageRecord) {
        override_fields!(
            self,
            other,
            name,
            command,
            extension,
            timeout,
            stderr,
            strip_code,
            strip_output,
            newline,
            tab,
            spacing,
            show_time,
            show_command,
            show_code,
            show_argv,
            show_stdin,
            show_output,
        );
    }
}

/// Records of one language list, keyed by normalized name, in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageMap {
    order: Vec<String>,
    records: HashMap<String, LanguageRecord>,
}

impl LanguageMap {
    /// Build a map from the raw JSON items of the list stored under `key`
    ///
    /// Items that are not objects, lack a `name`, or carry a wrongly typed
    /// attribute are dropped and described in `issues`.
    pub fn from_values(key: &str, items: &[Value], issues: &mut Vec<String>) -> Self {
        let mut map = Self::default();
        for item in items {
            if !item.is_object() {
                issues.push(format!(
                    "Item {item} in \"{key}\" is not a language object. Skipping language."
                ));
                continue;
            }
            let mut record: LanguageRecord = match serde_json::from_value(item.clone()) {
                Ok(record) => record,
                Err(e) => {
                    issues.push(format!(
                        "Invalid language {item} in \"{key}\": {e}. Skipping language."
                    ));
                    continue;
                }
            };
            let Some(name) = record.name.as_deref().map(str::trim) else {
                issues.push(format!("No \"name\" key found for {item}. Skipping language."));
                continue;
            };
            let name = name.to_string();
            let normalized = normalize(&name);
            record.name = Some(name);
            map.insert(normalized, record);
        }
        debug!("Built language map for \"{}\" with {} entries", key, map.len());
        map
    }

    pub fn insert(&mut self, normalized: String, record: LanguageRecord) {
        if !self.records.contains_key(&normalized) {
            self.order.push(normalized.clone());
        }
        self.records.insert(normalized, record);
    }

    pub fn get(&self, normalized: &str) -> Option<&LanguageRecord> {
        self.records.get(normalized)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// The four language maps that apply on one platform
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageLayers {
    pub custom_platform: LanguageMap,
    pub custom: LanguageMap,
    pub supplied_platform: LanguageMap,
    pub supplied: LanguageMap,
}

impl LanguageLayers {
    /// Merge every record for `normalized`, most specific applied last
    ///
    /// Returns `None` when no layer knows the name.
    pub fn merged(&self, normalized: &str) -> Option<LanguageRecord> {
        let layers = [
            &self.supplied,
            &self.supplied_platform,
            &self.custom,
            &self.custom_platform,
        ];
        let mut merged: Option<LanguageRecord> = None;
        for record in layers.iter().filter_map(|layer| layer.get(normalized)) {
            merged.get_or_insert_with(LanguageRecord::default).apply(record);
        }
        merged
    }

    /// All known normalized names, most specific layer first, without duplicates
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for layer in [
            &self.custom_platform,
            &self.custom,
            &self.supplied_platform,
            &self.supplied,
        ] {
            for name in layer.names() {
                if !names.iter().any(|known| known == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }
}
