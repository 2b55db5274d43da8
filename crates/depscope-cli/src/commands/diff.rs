//! `depscope diff`: annotate changed files with what they are and who
//! imports them.

use depscope_graph::{DiffRecord, DiffSource, join};

use crate::cli::DiffArgs;
use crate::commands::utils;
use crate::diff_source::{GitDiffSource, JsonDiffSource, is_git_repo};
use crate::error::{CliError, Result};
use crate::output;
use crate::ui;

/// Execute the diff command.
///
/// The change list is read before scanning so a bad ref or file fails fast.
/// Changed files that are not in the graph are left out of the report.
pub async fn execute(args: DiffArgs) -> Result<()> {
    let options = &args.options;
    let config = utils::load_scan_config(options)?;

    let records = changed_files(&args)?;
    tracing::debug!("{} changed file(s)", records.len());

    let outcome = utils::run_scan(config).await?;

    let joined = join(&records, &outcome.snapshot);

    let output_path = options.output.as_deref();
    let report = output::render_diff(
        &joined,
        &outcome.snapshot,
        args.transitive,
        options.format,
        utils::color_output(output_path),
    )?;
    utils::write_output(output_path, &report).await?;

    ui::info(&format!(
        "{} of {} changed file(s) are in the graph; {}",
        joined.len(),
        records.len(),
        output::summary(&outcome.snapshot, &outcome.issues)
    ));

    utils::check_strict(options.strict, &outcome.issues)
}

fn changed_files(args: &DiffArgs) -> Result<Vec<DiffRecord>> {
    if let Some(file) = &args.diff_file {
        return Ok(JsonDiffSource::new(file).changed_files()?);
    }

    let Some(base) = &args.base else {
        return Err(CliError::InvalidArgument(
            "either --base or --diff-file is required".to_string(),
        ));
    };

    let root = &args.options.root;
    if !is_git_repo(root) {
        return Err(CliError::InvalidArgument(format!(
            "{} is not inside a git repository\n\nHint: Use --diff-file to supply the change list",
            root.display()
        )));
    }

    let head = args.head.as_deref().unwrap_or("HEAD");
    Ok(GitDiffSource::new(root, base, head).changed_files()?)
}
