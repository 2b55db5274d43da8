//! Path alias handling for module resolution.
//!
//! An alias maps the first `/`-separated segment of a specifier to a
//! directory (e.g. `@views` → `<root>/src/views`). Only an exact match on
//! that segment counts; `@viewsExtra/x` does not match `@views`.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use rustc_hash::FxHashMap;

/// Alias prefixes mapped to absolute directories.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: FxHashMap<String, PathBuf>,
}

impl AliasTable {
    /// Build the table, anchoring relative directories at `root`.
    pub fn new<'a>(
        configured: impl IntoIterator<Item = (&'a String, &'a PathBuf)>,
        root: &Path,
    ) -> Self {
        let entries = configured
            .into_iter()
            .map(|(prefix, dir)| {
                let dir = if dir.is_absolute() {
                    dir.clean()
                } else {
                    root.join(dir).clean()
                };
                (prefix.clone(), dir)
            })
            .collect();

        Self { entries }
    }

    /// Directory registered for an exact head segment.
    pub fn get(&self, head: &str) -> Option<&Path> {
        self.entries.get(head).map(PathBuf::as_path)
    }

    /// Rewrite `specifier` against its alias directory, if its head is an alias.
    pub fn expand(&self, specifier: &str) -> Option<PathBuf> {
        let (head, rest) = specifier.split_once('/').unwrap_or((specifier, ""));
        let dir = self.get(head)?;

        Some(if rest.is_empty() {
            dir.to_path_buf()
        } else {
            dir.join(rest)
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
