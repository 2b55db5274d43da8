//! Error handling for the depscope CLI.
//!
//! Library errors convert into [`CliError`] through `#[from]`; the variants
//! that users can act on carry a hint. `main` turns the final error into a
//! miette report (see [`report`]).

mod report;

use std::path::PathBuf;

use depscope_config::ConfigError;
use depscope_graph::ScanError;
use thiserror::Error;

pub use report::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The scan itself failed
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),

    /// The change list could not be produced
    #[error("Diff error: {0}")]
    Diff(#[from] DiffError),

    /// `--strict` and the scan reported issues
    #[error("{count} import(s) could not be resolved, loaded or parsed\n\nHint: Run without --strict to see the graph anyway, or add the packages to --external")]
    StrictIssues { count: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

/// Errors from producing a change list.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("Failed to run git: {0}\n\nHint: Make sure git is installed and on PATH")]
    GitUnavailable(#[source] std::io::Error),

    #[error("git diff {range} failed: {stderr}\n\nHint: Check that both refs exist (git fetch may be needed)")]
    GitFailed { range: String, stderr: String },

    #[error("Unexpected git output: {0}")]
    GitOutput(String),

    #[error("Failed to read diff file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid diff file {}: {message}\n\nHint: Expected an array of {{\"path\": ...}} records or {{\"files\": [...]}}", path.display())]
    Format { path: PathBuf, message: String },
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Append a hint to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}\n\nHint: {}", err, hint))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}: {}", msg, err))
        })
    }
}
