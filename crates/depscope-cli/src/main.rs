//! depscope - map changed files to the modules that import them.

use clap::Parser;
use depscope_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init(args.quiet, args.no_color);

    let result = match args.command {
        cli::Command::Scan(scan_args) => commands::scan_execute(scan_args).await,
        cli::Command::Diff(diff_args) => commands::diff_execute(diff_args).await,
    };

    result.map_err(error::cli_error_to_miette)
}
