//! depscope CLI.
//!
//! - [`cli`] - argument definitions
//! - [`commands`] - `scan` and `diff`
//! - [`diff_source`] - git and JSON change lists
//! - [`output`] - text and JSON rendering
//! - [`error`] - error types and miette conversion
//! - [`logger`] - tracing setup

pub mod cli;
pub mod commands;
pub mod diff_source;
pub mod error;
pub mod logger;
pub mod output;
pub mod ui;

pub use error::{CliError, DiffError, Result, ResultExt};
