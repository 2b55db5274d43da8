//! Change-list sources for `depscope diff`.
//!
//! - [`GitDiffSource`] runs `git diff --name-status` between two refs
//! - [`JsonDiffSource`] reads records written by another tool

use std::path::{Path, PathBuf};
use std::process::Command;

use depscope_graph::{DiffRecord, DiffSource};
use serde_json::Value;

use crate::error::DiffError;

/// Changes between `base` and `head`, as seen from `root`.
///
/// Paths are reported relative to `root`; changes outside it are left out.
#[derive(Debug, Clone)]
pub struct GitDiffSource {
    root: PathBuf,
    base: String,
    head: String,
}

impl GitDiffSource {
    pub fn new(root: impl Into<PathBuf>, base: impl Into<String>, head: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base: base.into(),
            head: head.into(),
        }
    }

    /// The `base...head` range handed to git.
    pub fn range(&self) -> String {
        format!("{}...{}", self.base, self.head)
    }
}

impl DiffSource for GitDiffSource {
    type Error = DiffError;

    fn changed_files(&self) -> Result<Vec<DiffRecord>, DiffError> {
        let range = self.range();
        tracing::debug!("Running git diff {range} in {}", self.root.display());

        let output = Command::new("git")
            .args(["diff", "--name-status", "-z", "--relative"])
            .arg(&range)
            .current_dir(&self.root)
            .output()
            .map_err(DiffError::GitUnavailable)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DiffError::GitFailed {
                range,
                stderr: stderr.trim().to_string(),
            });
        }

        parse_name_status(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse `git diff --name-status -z` output.
///
/// Each entry is a status token followed by one path, or two for renames
/// and copies (`R100\0old\0new`).
pub fn parse_name_status(output: &str) -> Result<Vec<DiffRecord>, DiffError> {
    let mut fields = output.split('\0').filter(|field| !field.is_empty());
    let mut records = Vec::new();

    while let Some(status) = fields.next() {
        let letter = status
            .chars()
            .next()
            .ok_or_else(|| DiffError::GitOutput("empty status".to_string()))?;
        let mut path = || {
            fields
                .next()
                .ok_or_else(|| DiffError::GitOutput(format!("missing path after '{status}'")))
        };

        let record = match letter {
            'R' | 'C' => {
                let from = path()?;
                let to = path()?;
                DiffRecord::new(to)
                    .with("type", change_type(letter))
                    .with("from", from)
            }
            _ => DiffRecord::new(path()?).with("type", change_type(letter)),
        };
        records.push(record);
    }

    Ok(records)
}

fn change_type(letter: char) -> &'static str {
    match letter {
        'A' => "added",
        'M' => "modified",
        'D' => "deleted",
        'R' => "renamed",
        'C' => "copied",
        'T' => "type_changed",
        'U' => "unmerged",
        _ => "unknown",
    }
}

/// Change records from a JSON file.
///
/// Accepts an array or an object with a `files` array. Each entry is either
/// a path string or an object whose path is under `path` (or `file`); the
/// remaining keys are kept as metadata.
#[derive(Debug, Clone)]
pub struct JsonDiffSource {
    path: PathBuf,
}

impl JsonDiffSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DiffSource for JsonDiffSource {
    type Error = DiffError;

    fn changed_files(&self) -> Result<Vec<DiffRecord>, DiffError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| DiffError::Read {
            path: self.path.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|e| self.format_error(e))?;
        parse_records(value).map_err(|message| self.format_error(message))
    }
}

impl JsonDiffSource {
    fn format_error(&self, message: impl ToString) -> DiffError {
        DiffError::Format {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }
}

/// Turn a parsed change list into records.
pub fn parse_records(value: Value) -> Result<Vec<DiffRecord>, String> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut object) => match object.remove("files") {
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err("'files' must be an array".to_string()),
            None => return Err("object has no 'files' array".to_string()),
        },
        _ => return Err("expected an array or an object".to_string()),
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| parse_record(entry).map_err(|e| format!("entry {index}: {e}")))
        .collect()
}

fn parse_record(entry: Value) -> Result<DiffRecord, String> {
    match entry {
        Value::String(path) => Ok(DiffRecord::new(path)),
        Value::Object(mut meta) => {
            let path = match meta.remove("path") {
                Some(path) => path,
                None => meta
                    .remove("file")
                    .ok_or_else(|| "missing 'path' (or 'file')".to_string())?,
            };
            let Value::String(path) = path else {
                return Err("path must be a string".to_string());
            };
            Ok(DiffRecord { path, meta })
        }
        _ => Err("expected a path string or an object".to_string()),
    }
}

/// Whether `root` is inside a git work tree.
pub fn is_git_repo(root: &Path) -> bool {
    Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(root)
        .output()
        .is_ok_and(|o| o.status.success())
}
