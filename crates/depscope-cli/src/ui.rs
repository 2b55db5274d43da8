//! Status messages on stderr.
//!
//! Reports go to stdout (or `--output`); everything here goes to stderr so
//! piping JSON output stays clean.

use std::sync::atomic::{AtomicBool, Ordering};

use console::style;

static QUIET: AtomicBool = AtomicBool::new(false);

/// Apply the global `--quiet` and `--no-color` flags.
pub fn init(quiet: bool, no_color: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
    if no_color || std::env::var_os("NO_COLOR").is_some() {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
}

fn quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub fn success(message: &str) {
    if !quiet() {
        eprintln!("{} {}", style("✓").green().bold(), message);
    }
}

pub fn info(message: &str) {
    if !quiet() {
        eprintln!("{} {}", style("ℹ").blue().bold(), message);
    }
}

pub fn warning(message: &str) {
    if !quiet() {
        eprintln!("{} {}", style("⚠").yellow().bold(), style(message).yellow());
    }
}
