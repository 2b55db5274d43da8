//! Scan configuration.

use std::path::PathBuf;

use rustc_hash::FxHashMap;

use crate::descriptor::DEFAULT_MARKER;

/// Extensions probed, in order, when a specifier does not name a file exactly.
pub const DEFAULT_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "vue", "mjs", "cjs", "json"];

/// Extensions whose files are loaded, parsed and walked. Everything else is a leaf.
pub const DEFAULT_SCRIPT_EXTENSIONS: &[&str] =
    &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts", "vue"];

/// Default cap on simultaneous file loads and parses.
pub const DEFAULT_MAX_CONCURRENCY: usize = 64;

/// Everything a scan needs to know up front.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Repository root. Relative roots are taken from the runtime's cwd.
    pub root: PathBuf,

    /// Entry file, relative to `root`.
    pub entry: PathBuf,

    /// Specifier head segments that are never resolved (package names).
    pub external: Vec<String>,

    /// Logical prefix → directory. Relative directories are joined onto `root`.
    pub aliases: FxHashMap<String, PathBuf>,

    /// Probe order for extension-less specifiers, without leading dots.
    pub extensions: Vec<String>,

    /// Extensions that are parsed and walked, without leading dots.
    pub script_extensions: Vec<String>,

    /// Text identifying the descriptor comment block.
    pub marker: String,

    /// Maximum number of files loaded and parsed at the same time.
    pub max_concurrency: usize,

    /// Whether `import('...')` expressions create edges.
    pub follow_dynamic_imports: bool,

    /// Whether `export ... from '...'` declarations create edges.
    pub follow_reexports: bool,
}

impl ScanConfig {
    /// Configuration with defaults for everything but the root and entry.
    pub fn new(root: impl Into<PathBuf>, entry: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entry: entry.into(),
            ..Self::default()
        }
    }

    /// Add packages to the external-skip set.
    pub fn external(mut self, packages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.external.extend(packages.into_iter().map(Into::into));
        self
    }

    /// Add a path alias (e.g. `"@views"` → `"src/views"`).
    pub fn alias(mut self, prefix: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.aliases.insert(prefix.into(), dir.into());
        self
    }

    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit;
        self
    }

    pub fn follow_dynamic_imports(mut self, follow: bool) -> Self {
        self.follow_dynamic_imports = follow;
        self
    }

    pub fn follow_reexports(mut self, follow: bool) -> Self {
        self.follow_reexports = follow;
        self
    }

    /// Check the values a scan cannot start without.
    pub fn validate(&self) -> Result<(), String> {
        if self.entry.as_os_str().is_empty() {
            return Err("an entry file is required".to_string());
        }
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be at least 1".to_string());
        }
        if self.marker.is_empty() {
            return Err("descriptor marker must not be empty".to_string());
        }
        if let Some(ext) = self
            .extensions
            .iter()
            .chain(&self.script_extensions)
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(format!(
                "extension '{ext}' must be non-empty and written without a leading dot"
            ));
        }
        Ok(())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            entry: PathBuf::new(),
            external: Vec::new(),
            aliases: FxHashMap::default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            script_extensions: DEFAULT_SCRIPT_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            marker: DEFAULT_MARKER.to_string(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            follow_dynamic_imports: true,
            follow_reexports: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ScanConfig::new("/repo", "src/main.js")
            .external(["vue", "lodash"])
            .alias("@views", "src/views")
            .max_concurrency(4);

        assert_eq!(config.external.len(), 2);
        assert_eq!(config.aliases.len(), 1);
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.marker, "@Description");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_requires_entry() {
        let err = ScanConfig::default().validate().unwrap_err();
        assert!(err.contains("entry"));
    }

    #[test]
    fn test_rejects_dotted_extension() {
        let mut config = ScanConfig::new("/repo", "main.js");
        config.extensions.push(".ts".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.contains(".ts"));
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let config = ScanConfig::new("/repo", "main.js").max_concurrency(0);
        assert!(config.validate().is_err());
    }
}
