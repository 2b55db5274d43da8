//! Test utilities shared by this crate's tests and downstream crates.
//!
//! Enabled for `cfg(test)` and through the `test-utils` feature.

// Test utilities are allowed to use std::fs since they only run on native platforms
#![allow(clippy::disallowed_methods)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tempfile::TempDir;

use crate::runtime::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

/// Filesystem runtime that records reads and can slow them down.
///
/// Reads go straight to `std::fs`. The per-path read counter lets tests
/// assert that a module was loaded at most once; the optional delay widens
/// race windows between concurrent tasks.
#[derive(Debug)]
pub struct TestRuntime {
    cwd: PathBuf,
    read_delay: Option<Duration>,
    reads: Mutex<FxHashMap<PathBuf, usize>>,
}

impl TestRuntime {
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            read_delay: None,
            reads: Mutex::new(FxHashMap::default()),
        }
    }

    /// Sleep for `delay` before every read.
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    /// Number of times `path` was read.
    pub fn read_count(&self, path: &Path) -> usize {
        self.reads.lock().get(path).copied().unwrap_or(0)
    }

    /// Largest read count over all paths.
    pub fn max_read_count(&self) -> usize {
        self.reads.lock().values().copied().max().unwrap_or(0)
    }
}

#[async_trait]
impl Runtime for TestRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        *self.reads.lock().entry(path.to_path_buf()).or_default() += 1;

        std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RuntimeError::FileNotFound(path.to_path_buf()),
            _ => RuntimeError::Io(e.to_string()),
        })
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RuntimeError::FileNotFound(path.to_path_buf()),
            _ => RuntimeError::Io(e.to_string()),
        })?;
        Ok(FileMetadata {
            size: metadata.len(),
            is_file: metadata.is_file(),
            is_dir: metadata.is_dir(),
        })
    }

    async fn canonicalize(&self, path: &Path) -> RuntimeResult<PathBuf> {
        std::fs::canonicalize(path).map_err(|e| RuntimeError::Io(e.to_string()))
    }

    fn get_cwd(&self) -> RuntimeResult<PathBuf> {
        Ok(self.cwd.clone())
    }
}

/// Create a temporary project from `(relative path, contents)` pairs.
///
/// Parent directories are created as needed.
pub fn create_test_project(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().expect("failed to create temp dir");

    for (path, content) in files {
        let full_path = temp.path().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::fs::write(&full_path, content).expect("failed to write test file");
    }

    temp
}

/// Canonical path of `relative` inside `temp`.
pub fn project_path(temp: &TempDir, relative: &str) -> PathBuf {
    std::fs::canonicalize(temp.path().join(relative)).expect("test path must exist")
}
