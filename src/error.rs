use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the converter
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("{0}")]
    Usage(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Format error: {0}")]
    Format(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl ConvertError {
    /// Whether this error is a fatal precondition failure
    pub fn is_usage(&self) -> bool {
        matches!(self, ConvertError::Usage(_))
    }

    /// Whether this error is reported as a warning rather than an error
    pub fn is_warning(&self) -> bool {
        matches!(self, ConvertError::JsonParse { .. })
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ConvertError>;
