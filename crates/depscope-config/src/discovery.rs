//! Config file discovery and layered loading.
//!
//! Layers, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. `depscope.toml` in the root, else the `depscope` field of `package.json`
//!    (or an explicitly named file)
//! 3. `DEPSCOPE_*` environment variables (`DEPSCOPE_MAX_CONCURRENCY=8`)
//! 4. Command-line overrides

use std::fs;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use serde_json::Value;

use crate::config::{ConfigOverrides, DepscopeConfig};
use crate::error::{ConfigError, Result};

/// Name of the dedicated config file.
pub const CONFIG_FILE: &str = "depscope.toml";

/// Field of `package.json` holding embedded configuration.
pub const PACKAGE_JSON_FIELD: &str = "depscope";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "DEPSCOPE_";

/// Finds configuration files in a repository root.
///
/// # Example
///
/// ```no_run
/// use depscope_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// if let Some(path) = discovery.find() {
///     println!("using {}", path.display());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. `depscope.toml`
    /// 2. `package.json` with a non-null `depscope` field
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE);
        if toml_path.is_file() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.is_file() {
            if let Ok(Some(_)) = package_json_section(&pkg_path) {
                return Some(pkg_path);
            }
        }

        None
    }
}

/// Builds a [`DepscopeConfig`] from every configuration layer.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    root: PathBuf,
    file: Option<PathBuf>,
    env: bool,
}

impl ConfigLoader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            file: None,
            env: true,
        }
    }

    /// Use this file instead of discovering one. It must exist.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Ignore `DEPSCOPE_*` environment variables.
    pub fn without_env(mut self) -> Self {
        self.env = false;
        self
    }

    /// Merge all layers, with `overrides` on top.
    pub fn load(&self, overrides: &ConfigOverrides) -> Result<DepscopeConfig> {
        // Missing fields fall back through `#[serde(default)]`.
        let mut figment = Figment::new();

        if let Some(path) = self.config_file()? {
            tracing::debug!("Loading configuration from {}", path.display());
            figment = merge_file(figment, &path)?;
        }

        if self.env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX));
        }

        figment = figment.admerge(Serialized::defaults(overrides));

        Ok(figment.extract()?)
    }

    fn config_file(&self) -> Result<Option<PathBuf>> {
        match &self.file {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.clone()
                } else {
                    self.root.join(path)
                };
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path));
                }
                Ok(Some(path))
            }
            None => Ok(ConfigDiscovery::new(&self.root).find()),
        }
    }
}

/// Accepted alternative spellings and the field each one stands for.
const KEY_ALIASES: &[(&str, &str)] = &[
    ("alias", "aliases"),
    ("scriptExtensions", "script_extensions"),
    ("maxConcurrency", "max_concurrency"),
    ("followDynamicImports", "follow_dynamic_imports"),
    ("followReexports", "follow_reexports"),
];

/// Rewrite alternative top-level keys to their field names so that later
/// layers (env, flags) merge into the same key instead of a second spelling.
fn canonical_keys(section: Value) -> Value {
    let Value::Object(map) = section else {
        return section;
    };

    let mut canonical = serde_json::Map::with_capacity(map.len());
    for (key, value) in map {
        let name = KEY_ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map_or(key, |(_, field)| (*field).to_string());
        canonical.insert(name, value);
    }
    Value::Object(canonical)
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => {
            let section: Value = Figment::from(Toml::file(path)).extract()?;
            Ok(figment.merge(Serialized::defaults(canonical_keys(section))))
        }
        Some("json") => {
            let section = package_json_section(path)?.ok_or_else(|| ConfigError::InvalidValue {
                field: PACKAGE_JSON_FIELD.to_string(),
                message: format!(
                    "'{}' has no '{}' field",
                    path.display(),
                    PACKAGE_JSON_FIELD
                ),
            })?;
            Ok(figment.merge(Serialized::defaults(canonical_keys(section))))
        }
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// The `depscope` field of a `package.json`, if present and not null.
fn package_json_section(path: &Path) -> Result<Option<Value>> {
    let content = fs::read_to_string(path)?;
    let mut parsed: Value =
        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
            field: "package.json".to_string(),
            message: format!("invalid JSON: {e}"),
        })?;

    Ok(parsed
        .get_mut(PACKAGE_JSON_FIELD)
        .map(Value::take)
        .filter(|section| !section.is_null()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn find_returns_none_when_no_config() {
        let dir = TempDir::new().unwrap();
        assert!(ConfigDiscovery::new(dir.path()).find().is_none());
    }

    #[test]
    fn package_json_without_field_is_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name":"app"}"#).unwrap();
        assert!(ConfigDiscovery::new(dir.path()).find().is_none());
    }

    #[test]
    fn null_field_is_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"depscope":null}"#).unwrap();
        assert!(ConfigDiscovery::new(dir.path()).find().is_none());
    }

    #[test]
    fn defaults_when_nothing_configured() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::new(dir.path())
            .without_env()
            .load(&ConfigOverrides::default())
            .unwrap();
        assert_eq!(config, DepscopeConfig::default());
    }

    #[test]
    fn canonical_keys_renames_alternative_spellings() {
        let section = canonical_keys(serde_json::json!({
            "alias": { "@": "src" },
            "maxConcurrency": 4,
            "marker": "@Module"
        }));
        assert_eq!(
            section,
            serde_json::json!({
                "aliases": { "@": "src" },
                "max_concurrency": 4,
                "marker": "@Module"
            })
        );
    }

    #[test]
    fn camel_case_package_json_loads() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"depscope":{"entry":"src/main.js","maxConcurrency":4,"alias":{"@views":"src/views"}}}"#,
        )
        .unwrap();

        let overrides = ConfigOverrides {
            aliases: [("@".to_string(), PathBuf::from("src"))].into_iter().collect(),
            ..ConfigOverrides::default()
        };
        let config = ConfigLoader::new(dir.path())
            .without_env()
            .load(&overrides)
            .unwrap();
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.aliases["@views"], PathBuf::from("src/views"));
        assert_eq!(config.aliases["@"], PathBuf::from("src"));
        assert_eq!(config.marker, "@Description");
    }

    #[test]
    fn unsupported_explicit_format() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("depscope.yaml"), "entry: a").unwrap();
        let err = ConfigLoader::new(dir.path())
            .file("depscope.yaml")
            .without_env()
            .load(&ConfigOverrides::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
