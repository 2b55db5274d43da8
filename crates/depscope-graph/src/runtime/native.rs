//! Native runtime implementation.
//!
//! Wraps `std::fs` behind the `Runtime` trait. Blocking calls run on tokio's
//! blocking pool so a scan with thousands of in-flight edges never stalls the
//! async workers on disk I/O.

// NativeRuntime is the one place allowed to touch std::fs
#![allow(clippy::disallowed_methods)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::task;

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

/// Native filesystem `Runtime` backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRuntime;

impl NativeRuntime {
    pub fn new() -> Self {
        Self
    }
}

fn io_error(path: &Path, action: &str, err: std::io::Error) -> RuntimeError {
    if err.kind() == std::io::ErrorKind::NotFound {
        RuntimeError::FileNotFound(path.to_path_buf())
    } else {
        RuntimeError::Io(format!("Failed to {action} {}: {err}", path.display()))
    }
}

#[async_trait]
impl Runtime for NativeRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        let path = path.to_path_buf();

        task::spawn_blocking(move || std::fs::read(&path).map_err(|e| io_error(&path, "read", e)))
            .await
            .map_err(|e| RuntimeError::Other(format!("Task join error: {e}")))?
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let path = path.to_path_buf();

        task::spawn_blocking(move || {
            let metadata =
                std::fs::metadata(&path).map_err(|e| io_error(&path, "get metadata for", e))?;

            Ok(FileMetadata {
                size: metadata.len(),
                is_dir: metadata.is_dir(),
                is_file: metadata.is_file(),
            })
        })
        .await
        .map_err(|e| RuntimeError::Other(format!("Task join error: {e}")))?
    }

    async fn canonicalize(&self, path: &Path) -> RuntimeResult<PathBuf> {
        let path = path.to_path_buf();

        task::spawn_blocking(move || {
            std::fs::canonicalize(&path).map_err(|e| io_error(&path, "canonicalize", e))
        })
        .await
        .map_err(|e| RuntimeError::Other(format!("Task join error: {e}")))?
    }

    fn get_cwd(&self) -> RuntimeResult<PathBuf> {
        std::env::current_dir().map_err(|e| {
            RuntimeError::Io(format!("Failed to get current working directory: {e}"))
        })
    }
}
