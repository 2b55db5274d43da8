//! Error types for configuration loading and validation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Filesystem validation errors
    #[error("repository root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("entry file not found: {}", .0.display())]
    EntryNotFound(PathBuf),

    // Config parsing/loading errors
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("failed to load configuration: {0}")]
    Load(String),

    // Schema validation errors
    #[error("no entry file specified")]
    NoEntry,

    #[error("invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(err.to_string())
    }
}
