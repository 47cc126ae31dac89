//! Settings management for runmany
//!
//! The built-in schema holds every recognized key with its default. Override
//! documents are resolved against it into a [`Settings`] value, which caches a
//! fully resolved [`Language`] for every known language name.

pub mod layer;
pub mod loader;
pub mod policy;
mod settings;

// Re-export main types
pub use layer::{LanguageLayers, LanguageMap, LanguageRecord, normalize};
pub use loader::{SettingsSource, parse_settings_text};
pub use policy::Policy;
pub use settings::{GlobalSettings, Language, Platform, Settings, SettingsSchema};
