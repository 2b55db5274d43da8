//! Configuration for depscope: discovery, layering and validation.

pub mod config;
pub mod discovery;
pub mod error;
pub mod validation;

pub use config::{ConfigOverrides, DepscopeConfig};
pub use discovery::{CONFIG_FILE, ConfigDiscovery, ConfigLoader, ENV_PREFIX, PACKAGE_JSON_FIELD};
pub use error::{ConfigError, Result};
pub use validation::{ConfigValidator, FsValidator, SchemaValidator, validate_fs, validate_schema};
