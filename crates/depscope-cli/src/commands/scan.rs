//! `depscope scan`: print every file reachable from the entry.

use std::time::Instant;

use crate::cli::ScanArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::output;
use crate::ui;

/// Execute the scan command.
///
/// 1. Load and validate configuration (flags > env > file > defaults)
/// 2. Scan the import graph
/// 3. Print the graph in the requested format (issues are logged as warnings)
/// 4. Fail under `--strict` if anything could not be followed
pub async fn execute(args: ScanArgs) -> Result<()> {
    let options = args.options;
    let start = Instant::now();

    let config = utils::load_scan_config(&options)?;
    let outcome = utils::run_scan(config).await?;

    let output_path = options.output.as_deref();
    let report = output::render_scan(
        &outcome.snapshot,
        &outcome.issues,
        options.format,
        utils::color_output(output_path),
    )?;
    utils::write_output(output_path, &report).await?;

    ui::info(&format!(
        "{} in {:.2?}",
        output::summary(&outcome.snapshot, &outcome.issues),
        start.elapsed()
    ));

    utils::check_strict(options.strict, &outcome.issues)
}
