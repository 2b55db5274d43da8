//! Scan errors and per-module issues.
//!
//! A [`ScanError`] aborts the whole scan. A [`ScanIssue`] is recorded for one
//! import and the scan carries on without that branch of the graph.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::loader::LoadError;
use crate::parser::ParseFailure;
use crate::resolver::{ResolutionFailure, head_segment};
use crate::runtime::RuntimeError;

/// Fatal scan errors.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Invalid scan configuration: {0}")]
    InvalidConfig(String),

    #[error("Repository root '{}' is not accessible: {source}", path.display())]
    RootNotFound {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    #[error("Entry file not found: {}", .0.display())]
    EntryNotFound(PathBuf),

    #[error("Failed to load entry file: {0}")]
    EntryLoad(#[source] LoadError),

    #[error("Failed to parse entry file: {0}")]
    EntryParse(#[source] ParseFailure),

    #[error("Scan cancelled")]
    Cancelled,

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Why a module could not be loaded and parsed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModuleError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Parse(#[from] ParseFailure),
}

/// Stage of the pipeline an issue came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Resolution,
    Load,
    Parse,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IssueKind::Resolution => "resolution",
            IssueKind::Load => "load",
            IssueKind::Parse => "parse",
        })
    }
}

/// A non-fatal problem with a single import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind} error for '{specifier}' imported by '{}': {message}", importer.display())]
pub struct ScanIssue {
    pub kind: IssueKind,

    /// File containing the import
    pub importer: PathBuf,

    /// Specifier as written
    pub specifier: String,

    /// First `/`-separated segment of the specifier
    pub head: String,

    /// Resolved file, when resolution got that far
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,

    pub message: String,
}

impl ScanIssue {
    /// Issue for a module that resolved but could not be loaded or parsed.
    pub fn module(importer: PathBuf, specifier: String, target: PathBuf, err: &ModuleError) -> Self {
        let kind = match err {
            ModuleError::Load(_) => IssueKind::Load,
            ModuleError::Parse(_) => IssueKind::Parse,
        };

        Self {
            kind,
            head: head_segment(&specifier).to_string(),
            importer,
            specifier,
            target: Some(target),
            message: err.to_string(),
        }
    }
}

impl From<ResolutionFailure> for ScanIssue {
    fn from(failure: ResolutionFailure) -> Self {
        let message = failure.to_string();
        Self {
            kind: IssueKind::Resolution,
            importer: failure.importer,
            specifier: failure.specifier,
            head: failure.head,
            target: None,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_from_resolution_failure() {
        let failure = ResolutionFailure {
            importer: PathBuf::from("/r/src/main.js"),
            specifier: "@views/missing".to_string(),
            head: "@views".to_string(),
            probes: vec![PathBuf::from("/r/src/views/missing")],
        };

        let issue = ScanIssue::from(failure);
        assert_eq!(issue.kind, IssueKind::Resolution);
        assert_eq!(issue.head, "@views");
        assert!(issue.target.is_none());
        assert!(issue.message.contains("@views/missing"));
    }

    #[test]
    fn test_issue_serializes_kind_in_snake_case() {
        let err = ModuleError::Parse(ParseFailure {
            path: PathBuf::from("/r/bad.js"),
            message: "Unexpected token".to_string(),
        });
        let issue = ScanIssue::module(
            PathBuf::from("/r/main.js"),
            "./bad".to_string(),
            PathBuf::from("/r/bad.js"),
            &err,
        );

        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["kind"], "parse");
        assert_eq!(json["head"], ".");
        assert_eq!(json["target"], "/r/bad.js");
    }
}
