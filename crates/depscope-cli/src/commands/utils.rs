//! Steps shared by the scanning commands.

use std::path::Path;

use depscope_config::{ConfigLoader, ConfigOverrides, ConfigValidator, FsValidator};
use depscope_graph::{CancellationToken, ScanConfig, ScanIssue, ScanOutcome, Scanner};

use crate::cli::ScanOptions;
use crate::error::{CliError, Result, ResultExt};
use crate::ui;

/// Layer config file, environment and flags into a validated scan config.
pub(crate) fn load_scan_config(options: &ScanOptions) -> Result<ScanConfig> {
    let root = options.root.as_path();
    let overrides = overrides_from(options);

    let mut loader = ConfigLoader::new(root);
    if let Some(file) = &options.config {
        loader = loader.file(file);
    }

    let config = loader.load(&overrides)?;
    FsValidator::new(root).validate(&config)?;

    Ok(config.to_scan_config(root)?)
}

pub(crate) fn overrides_from(options: &ScanOptions) -> ConfigOverrides {
    ConfigOverrides {
        entry: options.entry.clone(),
        external: options.external.clone(),
        aliases: options.alias.iter().cloned().collect(),
        marker: options.marker.clone(),
        max_concurrency: options.max_concurrency.map(|n| n as usize),
        follow_dynamic_imports: options.no_dynamic.then_some(false),
        follow_reexports: options.follow_reexports.then_some(true),
    }
}

/// Run a scan, cancelling it on Ctrl-C.
pub(crate) async fn run_scan(config: ScanConfig) -> Result<ScanOutcome> {
    let token = CancellationToken::new();
    let scan = Scanner::new(config).cancellation(token.clone()).scan();
    tokio::pin!(scan);

    let outcome = tokio::select! {
        result = &mut scan => result?,
        Ok(()) = tokio::signal::ctrl_c() => {
            ui::warning("Interrupted, waiting for in-flight files...");
            token.cancel();
            scan.await?
        }
    };

    Ok(outcome)
}

/// Fail under `--strict` when the scan reported issues.
pub(crate) fn check_strict(strict: bool, issues: &[ScanIssue]) -> Result<()> {
    if strict && !issues.is_empty() {
        return Err(CliError::StrictIssues {
            count: issues.len(),
        });
    }
    Ok(())
}

/// Write a report to `path`, or stdout when there is none.
pub(crate) async fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await.with_path(parent)?;
                }
            }
            tokio::fs::write(path, content)
                .await
                .context(format!("Failed to write {}", path.display()))?;
            ui::success(&format!("Wrote {}", path.display()));
        }
        None => print!("{content}"),
    }
    Ok(())
}

/// Whether report text should carry ANSI colors.
pub(crate) fn color_output(path: Option<&Path>) -> bool {
    path.is_none() && console::colors_enabled()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_overrides_leave_unset_flags_alone() {
        let overrides = overrides_from(&ScanOptions::default());
        assert!(overrides.entry.is_none());
        assert!(overrides.follow_dynamic_imports.is_none());
        assert!(overrides.follow_reexports.is_none());
        assert!(overrides.max_concurrency.is_none());
    }

    #[test]
    fn test_overrides_from_flags() {
        let options = ScanOptions {
            entry: Some(PathBuf::from("src/main.js")),
            alias: vec![("@".to_string(), PathBuf::from("src"))],
            no_dynamic: true,
            follow_reexports: true,
            max_concurrency: Some(4),
            ..ScanOptions::default()
        };
        let overrides = overrides_from(&options);
        assert_eq!(overrides.follow_dynamic_imports, Some(false));
        assert_eq!(overrides.follow_reexports, Some(true));
        assert_eq!(overrides.max_concurrency, Some(4));
        assert_eq!(overrides.aliases["@"], PathBuf::from("src"));
    }

    #[test]
    fn test_check_strict() {
        let issue = ScanIssue {
            kind: depscope_graph::IssueKind::Resolution,
            importer: PathBuf::from("/r/a.js"),
            specifier: "./b".to_string(),
            head: ".".to_string(),
            target: None,
            message: "not found".to_string(),
        };
        assert!(check_strict(false, std::slice::from_ref(&issue)).is_ok());
        assert!(check_strict(true, &[]).is_ok());
        assert!(matches!(
            check_strict(true, &[issue]),
            Err(CliError::StrictIssues { count: 1 })
        ));
    }
}
