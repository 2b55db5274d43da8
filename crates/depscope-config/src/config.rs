//! Serializable configuration model.

use std::path::{Path, PathBuf};

use depscope_graph::{
    DEFAULT_EXTENSIONS, DEFAULT_MARKER, DEFAULT_MAX_CONCURRENCY, DEFAULT_SCRIPT_EXTENSIONS,
    ScanConfig,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Settings read from `depscope.toml`, the `depscope` field of
/// `package.json`, `DEPSCOPE_*` environment variables and CLI flags.
///
/// ```toml
/// entry = "src/main.js"
/// external = ["vue", "vue-router", "axios"]
/// marker = "@Description"
///
/// [aliases]
/// "@views" = "src/views"
/// "@" = "src"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepscopeConfig {
    /// Entry file, relative to the repository root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<PathBuf>,

    /// Package names that are never followed
    pub external: Vec<String>,

    /// Alias prefix → directory (relative to the root)
    #[serde(alias = "alias")]
    pub aliases: IndexMap<String, PathBuf>,

    /// Probe order for extension-less specifiers
    pub extensions: Vec<String>,

    /// Extensions that are parsed and walked
    #[serde(alias = "scriptExtensions")]
    pub script_extensions: Vec<String>,

    /// Tag identifying the descriptor comment
    pub marker: String,

    #[serde(alias = "maxConcurrency")]
    pub max_concurrency: usize,

    #[serde(alias = "followDynamicImports")]
    pub follow_dynamic_imports: bool,

    #[serde(alias = "followReexports")]
    pub follow_reexports: bool,
}

impl Default for DepscopeConfig {
    fn default() -> Self {
        Self {
            entry: None,
            external: Vec::new(),
            aliases: IndexMap::new(),
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

impl DepscopeConfig {
    /// Build the scanner configuration for a repository rooted at `root`.
    pub fn to_scan_config(&self, root: &Path) -> Result<ScanConfig> {
        let entry = self.entry.clone().ok_or(ConfigError::NoEntry)?;

        Ok(ScanConfig {
            root: root.to_path_buf(),
            entry,
            external: self.external.clone(),
            aliases: self
                .aliases
                .iter()
                .map(|(prefix, dir)| (prefix.clone(), dir.clone()))
                .collect(),
            extensions: self.extensions.clone(),
            script_extensions: self.script_extensions.clone(),
            marker: self.marker.clone(),
            max_concurrency: self.max_concurrency,
            follow_dynamic_imports: self.follow_dynamic_imports,
            follow_reexports: self.follow_reexports,
        })
    }
}

/// Values supplied on the command line. Unset fields leave lower layers alone.
///
/// List and table fields are appended to what the lower layers provide.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<PathBuf>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub external: Vec<String>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub aliases: IndexMap<String, PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_dynamic_imports: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_reexports: Option<bool>,
}
