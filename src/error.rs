//! Error types for the optmap config-map engine.

use std::path::PathBuf;
use thiserror::Error;

/// Store-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to open option store at {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    #[error("Failed to read option '{key}': {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("Failed to write option '{key}': {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("Stored value for '{key}' is not valid JSON: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors surfaced by config-map operations
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unknown map id: {0}")]
    UnknownMapId(String),

    #[error("Failed to load map {}: {reason}", path.display())]
    LoadError { path: PathBuf, reason: String },

    #[error("No maps defined. Add a [[maps]] entry to optmap.toml.")]
    EmptyMapSet,

    #[error("Failed to persist option '{key}': {reason}")]
    StoreWriteError { key: String, reason: String },

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to render map: {0}")]
    RenderError(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl ApiError {
    pub(crate) fn load(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        ApiError::LoadError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
