//! Specifier resolution.
//!
//! Turns an import specifier, as written in an importing file, into the
//! absolute path of an existing file:
//!
//! 1. Specifiers whose package name is external are skipped
//! 2. An alias head segment is rewritten to its directory
//! 3. Anything else is joined onto the importer's directory
//! 4. The candidate is probed as-is, with each extension appended, then as a
//!    directory holding an `index.<ext>` file
//!
//! The first probe naming a regular file wins and is canonicalized.

mod aliases;
mod extensions;

pub use aliases::AliasTable;
pub use extensions::{first_file, is_file, probe_candidates};

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use rustc_hash::FxHashSet;

use crate::config::ScanConfig;
use crate::runtime::Runtime;

/// Outcome of resolving one specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Canonical path of the imported file
    Resolved(PathBuf),
    /// Specifier names an external package and was not followed
    External,
}

/// No probe for a specifier named an existing file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Cannot resolve '{specifier}' from '{}' ({} candidates tried)",
    importer.display(),
    probes.len()
)]
pub struct ResolutionFailure {
    /// File containing the import
    pub importer: PathBuf,
    /// Specifier as written
    pub specifier: String,
    /// First `/`-separated segment of the specifier
    pub head: String,
    /// Every path probed, in order
    pub probes: Vec<PathBuf>,
}

/// First `/`-separated segment of a specifier.
pub fn head_segment(specifier: &str) -> &str {
    specifier.split('/').next().unwrap_or(specifier)
}

/// Resolves specifiers against the filesystem exposed by a [`Runtime`].
#[derive(Debug, Clone)]
pub struct PathResolver {
    aliases: AliasTable,
    external: FxHashSet<String>,
    extensions: Vec<String>,
}

impl PathResolver {
    /// Build a resolver from scan configuration, anchoring aliases at `root`.
    pub fn new(config: &ScanConfig, root: &Path) -> Self {
        Self {
            aliases: AliasTable::new(&config.aliases, root),
            external: config.external.iter().cloned().collect(),
            extensions: config.extensions.clone(),
        }
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Whether the specifier's package name is in the external set.
    ///
    /// The package name is the head segment, or the first two segments for
    /// scoped names (`@scope/pkg`); either form may be listed.
    pub fn is_external(&self, specifier: &str) -> bool {
        let mut segments = specifier.split('/');
        let Some(head) = segments.next() else {
            return false;
        };

        if self.external.contains(head) {
            return true;
        }

        match segments.next() {
            Some(name) if head.starts_with('@') => {
                self.external.contains(&format!("{head}/{name}"))
            }
            _ => false,
        }
    }

    /// Resolve `specifier` as imported from `importer`.
    pub async fn resolve(
        &self,
        importer: &Path,
        specifier: &str,
        runtime: &dyn Runtime,
    ) -> Result<Resolution, ResolutionFailure> {
        if self.is_external(specifier) {
            return Ok(Resolution::External);
        }

        let base = self.candidate_base(importer, specifier);
        let mut probes = Vec::new();
        let found = first_file(
            probe_candidates(&base, &self.extensions),
            runtime,
            &mut probes,
        )
        .await;

        match found {
            Some(path) => {
                let canonical = runtime.canonicalize(&path).await.unwrap_or(path);
                Ok(Resolution::Resolved(canonical))
            }
            None => Err(ResolutionFailure {
                importer: importer.to_path_buf(),
                specifier: specifier.to_string(),
                head: head_segment(specifier).to_string(),
                probes,
            }),
        }
    }

    fn candidate_base(&self, importer: &Path, specifier: &str) -> PathBuf {
        if let Some(expanded) = self.aliases.expand(specifier) {
            return expanded.clean();
        }

        let dir = importer.parent().unwrap_or(importer);
        dir.join(specifier).clean()
    }
}
