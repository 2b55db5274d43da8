//! Miette report conversion for CLI errors.

use depscope_config::ConfigError;
use depscope_graph::ScanError;
use miette::Report;

use crate::error::CliError;

/// Convert a [`CliError`] into a miette report, adding hints where the
/// underlying library error has none.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Scan(e) => scan_error_to_miette(e),
        CliError::Config(e) => config_error_to_miette(e),
        _ => miette::miette!("{}", err),
    }
}

fn scan_error_to_miette(err: ScanError) -> Report {
    match err {
        ScanError::EntryNotFound(path) => miette::miette!(
            "Entry file not found: {}\n\nHint: The entry is relative to --root",
            path.display()
        ),
        ScanError::EntryParse(e) => miette::miette!(
            "Failed to parse entry file: {}\n\nHint: The entry must be valid JavaScript, TypeScript or Vue",
            e
        ),
        ScanError::Cancelled => miette::miette!("Scan cancelled"),
        other => miette::miette!("Scan failed: {}", other),
    }
}

fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::NoEntry => miette::miette!(
            "No entry file specified\n\nHint: Pass ENTRY, or set `entry` in depscope.toml or the \"depscope\" field of package.json"
        ),
        ConfigError::NotFound(path) => miette::miette!(
            "Config file not found: {}\n\nHint: --config is relative to --root",
            path.display()
        ),
        other => miette::miette!("Configuration error: {}", other),
    }
}
