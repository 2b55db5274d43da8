//! Command-line interface definition for depscope.
//!
//! - `depscope scan` - build the dependency graph from an entry file and print it
//! - `depscope diff` - join a change list onto the graph and print what each
//!   changed file is and who imports it

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// depscope - who imports the files you changed?
#[derive(Parser, Debug)]
#[command(
    name = "depscope",
    version,
    about = "Map changed files to the modules that import them",
    long_about = "depscope walks the import graph of a JavaScript/TypeScript/Vue project\n\
                  from one entry file and records, for every reachable file, its\n\
                  descriptor comment and the files that import it. Joined onto a git\n\
                  diff it shows reviewers what a change can affect."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan the import graph and print every reachable file
    Scan(ScanArgs),

    /// Annotate changed files with their descriptor and dependents
    ///
    /// The change list comes from git (`--base`) or from a JSON file
    /// (`--diff-file`).
    Diff(DiffArgs),
}

/// Options shared by every command that scans.
#[derive(Args, Debug, Clone, Default)]
pub struct ScanOptions {
    /// Entry file, relative to the root (overrides the config file)
    #[arg(value_name = "ENTRY")]
    pub entry: Option<PathBuf>,

    /// Repository root
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    /// Config file (defaults to depscope.toml or the "depscope" field of package.json)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Package that is never followed (repeatable)
    ///
    /// Examples:
    ///   depscope scan --external vue --external @vue/shared
    #[arg(long = "external", value_name = "NAME")]
    pub external: Vec<String>,

    /// Alias prefix mapped to a directory under the root (repeatable)
    ///
    /// Examples:
    ///   depscope scan --alias @views=src/views --alias @=src
    #[arg(long = "alias", value_name = "KEY=DIR", value_parser = parse_alias)]
    pub alias: Vec<(String, PathBuf)>,

    /// Tag identifying the descriptor comment
    #[arg(long, value_name = "TAG")]
    pub marker: Option<String>,

    /// Maximum number of files loaded and parsed at once
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_concurrency: Option<u32>,

    /// Do not follow dynamic `import()` calls
    #[arg(long)]
    pub no_dynamic: bool,

    /// Follow `export ... from` re-exports
    #[arg(long)]
    pub follow_reexports: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Exit with an error when any import could not be resolved, loaded or parsed
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub options: ScanOptions,
}

#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub options: ScanOptions,

    /// Base git ref; changes are taken from `BASE...HEAD`
    #[arg(long, value_name = "REF", required_unless_present = "diff_file")]
    pub base: Option<String>,

    /// Head git ref [default: HEAD]
    #[arg(long, value_name = "REF", requires = "base")]
    pub head: Option<String>,

    /// JSON change list: an array of records, or `{ "files": [...] }`
    #[arg(long, value_name = "FILE", conflicts_with = "base")]
    pub diff_file: Option<PathBuf>,

    /// Also count every file that reaches a changed file transitively
    #[arg(long)]
    pub transitive: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Parse `KEY=DIR`.
fn parse_alias(value: &str) -> Result<(String, PathBuf), String> {
    let (key, dir) = value
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=DIR, got '{value}'"))?;

    if key.is_empty() {
        return Err("alias prefix cannot be empty".to_string());
    }
    if dir.is_empty() {
        return Err(format!("alias '{key}' has no directory"));
    }

    Ok((key.to_string(), PathBuf::from(dir)))
}
