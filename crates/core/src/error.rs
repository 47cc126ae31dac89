use std::io;

/// Errors that can occur during runmany operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Settings error: {0}")]
    SettingsError(String),

    #[error("Language \"{0}\" not found in settings")]
    UnknownLanguage(String),

    #[error("Failed to spawn \"{command}\": {source}")]
    SpawnError {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type alias for runmany operations
pub type Result<T> = std::result::Result<T, Error>;
