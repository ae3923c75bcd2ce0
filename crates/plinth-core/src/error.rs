//! Error types for Plinth

use thiserror::Error;

/// The main error type for Plinth operations
#[derive(Debug, Error)]
pub enum PlinthError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid transform: {0}")]
    InvalidTransform(String),

    #[error("No object selected for {0}")]
    NoSelection(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("no exportable models in the scene")]
    EmptyScene,

    #[error("Export error: {0}")]
    Export(String),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("TOML serialization error: {0}")]
    TomlSer(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias for Plinth operations
pub type Result<T> = std::result::Result<T, PlinthError>;

impl From<toml::de::Error> for PlinthError {
    fn from(err: toml::de::Error) -> Self {
        PlinthError::TomlParse(err.to_string())
    }
}

impl From<toml::ser::Error> for PlinthError {
    fn from(err: toml::ser::Error) -> Self {
        PlinthError::TomlSer(err.to_string())
    }
}
