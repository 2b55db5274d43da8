//! Platform runtime abstraction for the scanner.
//!
//! The scanner never touches `std::fs` directly. Every filesystem question it
//! asks (does this probe exist, is it a file, what is its canonical form, what
//! are its bytes) goes through the `Runtime` trait so the engine can run against
//! temporary directories in tests or against a virtual filesystem.

#[cfg(not(target_family = "wasm"))]
pub mod native;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Filesystem failures reported by a [`Runtime`].
///
/// Cloneable so one failure can be recorded as an issue and logged.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RuntimeError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Runtime error: {0}")]
    Other(String),
}

/// What the scanner needs to know about a path before reading it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    /// Size in bytes, checked against the loader's limit
    pub size: u64,
    pub is_dir: bool,
    pub is_file: bool,
}

/// Filesystem access for a scan.
///
/// One runtime is shared by every task a scan spawns (`Arc<dyn Runtime>`).
/// Every filesystem question is async so no probe blocks a worker thread.
/// A missing path is reported as [`RuntimeError::FileNotFound`]. Only
/// `get_cwd` is synchronous; the scanner calls it once at startup.
///
/// ```rust,ignore
/// use depscope_graph::{Runtime, RuntimeResult, FileMetadata};
///
/// #[derive(Debug)]
/// struct InMemory(std::collections::HashMap<PathBuf, Vec<u8>>);
///
/// #[async_trait::async_trait]
/// impl Runtime for InMemory {
///     async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
///         self.0
///             .get(path)
///             .cloned()
///             .ok_or_else(|| RuntimeError::FileNotFound(path.to_path_buf()))
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait Runtime: Send + Sync + std::fmt::Debug {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>>;

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata>;

    /// Resolve a path to its canonical, symlink-free absolute form.
    async fn canonicalize(&self, path: &Path) -> RuntimeResult<PathBuf>;

    /// Directory that relative repository roots are taken from.
    fn get_cwd(&self) -> RuntimeResult<PathBuf>;
}
