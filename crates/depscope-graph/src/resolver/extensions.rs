//! Extension and index-file probing.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// Ordered probe list for a candidate base path.
///
/// The base itself comes first, then the base with each extension appended
/// (`./a.service` → `a.service.js`, never `a.js`), then `index.<ext>` inside
/// the base for each extension.
pub fn probe_candidates(base: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(1 + extensions.len() * 2);
    candidates.push(base.to_path_buf());

    for ext in extensions {
        let mut with_ext = OsString::from(base.as_os_str());
        with_ext.push(".");
        with_ext.push(ext);
        candidates.push(PathBuf::from(with_ext));
    }

    for ext in extensions {
        candidates.push(base.join(format!("index.{ext}")));
    }

    candidates
}

/// Whether `path` names an existing regular file.
///
/// Only the async `metadata` call is used; a missing path is an error there.
pub async fn is_file(path: &Path, runtime: &dyn Runtime) -> bool {
    runtime
        .metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_file)
}

/// Probe candidates in order and return the first regular file.
///
/// Every probed path is appended to `attempted`, whether or not it matched.
pub async fn first_file(
    candidates: Vec<PathBuf>,
    runtime: &dyn Runtime,
    attempted: &mut Vec<PathBuf>,
) -> Option<PathBuf> {
    for candidate in candidates {
        let found = is_file(&candidate, runtime).await;
        attempted.push(candidate);
        if found {
            return attempted.last().cloned();
        }
    }

    None
}
