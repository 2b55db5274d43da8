//! Pluggable config validation strategies
//!
//! Separates schema checks (usable with virtual filesystems) from the
//! filesystem checks the CLI runs before scanning.

use std::path::{Path, PathBuf};

use crate::config::DepscopeConfig;
use crate::error::{ConfigError, Result};

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &DepscopeConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// ```
/// use depscope_config::{ConfigValidator, DepscopeConfig, SchemaValidator};
///
/// let config = DepscopeConfig {
///     entry: Some("src/main.js".into()),
///     ..DepscopeConfig::default()
/// };
/// SchemaValidator.validate(&config).unwrap();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &DepscopeConfig) -> Result<()> {
        match &config.entry {
            None => return Err(ConfigError::NoEntry),
            Some(entry) if entry.as_os_str().is_empty() => return Err(ConfigError::NoEntry),
            Some(_) => {}
        }

        if config.max_concurrency == 0 {
            return Err(invalid("max_concurrency", "must be at least 1"));
        }

        if config.marker.trim().is_empty() {
            return Err(invalid("marker", "cannot be empty"));
        }

        if config.external.iter().any(|name| name.trim().is_empty()) {
            return Err(invalid("external", "package names cannot be empty"));
        }

        if config.aliases.keys().any(|prefix| prefix.is_empty() || prefix.contains('/')) {
            return Err(invalid(
                "aliases",
                "alias prefixes must be a single non-empty path segment",
            ));
        }

        for (field, list) in [
            ("extensions", &config.extensions),
            ("script_extensions", &config.script_extensions),
        ] {
            if let Some(ext) = list.iter().find(|ext| ext.is_empty() || ext.starts_with('.')) {
                return Err(invalid(
                    field,
                    &format!("'{ext}' must be non-empty and written without a leading dot"),
                ));
            }
        }

        Ok(())
    }
}

/// Filesystem validator (for CLI use)
///
/// Runs schema validation, then checks that the root and entry exist.
#[derive(Debug, Clone)]
pub struct FsValidator {
    root: PathBuf,
}

impl FsValidator {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &DepscopeConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        if !self.root.is_dir() {
            return Err(ConfigError::RootNotFound(self.root.clone()));
        }

        if let Some(entry) = &config.entry {
            let path = self.root.join(entry);
            if !path.is_file() {
                return Err(ConfigError::EntryNotFound(path));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Convenience function for schema-only validation
pub fn validate_schema(config: &DepscopeConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

/// Convenience function for filesystem validation
pub fn validate_fs(config: &DepscopeConfig, root: impl AsRef<Path>) -> Result<()> {
    FsValidator::new(root).validate(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> DepscopeConfig {
        DepscopeConfig {
            entry: Some(PathBuf::from("src/main.js")),
            ..DepscopeConfig::default()
        }
    }

    #[test]
    fn schema_accepts_defaults_with_entry() {
        assert!(validate_schema(&valid()).is_ok());
    }

    #[test]
    fn schema_rejects_missing_entry() {
        let config = DepscopeConfig::default();
        assert!(matches!(validate_schema(&config), Err(ConfigError::NoEntry)));
    }

    #[test]
    fn schema_rejects_bad_values() {
        let mut config = valid();
        config.max_concurrency = 0;
        assert!(validate_schema(&config).is_err());

        let mut config = valid();
        config.extensions.push(".ts".to_string());
        let err = validate_schema(&config).unwrap_err();
        assert!(err.to_string().contains("extensions"));

        let mut config = valid();
        config
            .aliases
            .insert("@a/b".to_string(), PathBuf::from("src"));
        assert!(validate_schema(&config).is_err());
    }
}
