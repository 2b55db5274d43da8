//! Command implementations.
//!
//! - [`scan`] - print the dependency graph
//! - [`diff`] - join a change list onto the graph

pub mod diff;
pub mod scan;
pub(crate) mod utils;

pub use diff::execute as diff_execute;
pub use scan::execute as scan_execute;
