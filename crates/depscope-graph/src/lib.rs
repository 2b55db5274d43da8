//! # depscope-graph
//!
//! Static import-dependency graph construction for front-end source trees.
//!
//! Starting from one entry file, the scanner follows every relative and
//! aliased import (static, dynamic, and optionally re-exports) and records,
//! for each reachable file, who imports it and what its descriptor comment
//! says. The result is a [`GraphSnapshot`] that can be joined onto a list of
//! changed files to show reviewers what a change touches.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use depscope_graph::{DiffRecord, ScanConfig, Scanner, join};
//!
//! # async fn example() -> Result<(), depscope_graph::ScanError> {
//! let config = ScanConfig::new(".", "src/main.js")
//!     .external(["vue", "vue-router", "axios"])
//!     .alias("@views", "src/views");
//!
//! let outcome = Scanner::new(config).scan().await?;
//!
//! let changed = vec![DiffRecord::new("src/views/orders/List.vue").with("type", "modified")];
//! for record in join(&changed, &outcome.snapshot) {
//!     println!("{} <- {:?}", record.path, record.dependents);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Each import edge is its own tokio task. Files are claimed atomically so
//! each one is loaded and parsed at most once, however many importers race
//! for it. The scan completes when the last outstanding task finishes.

pub mod cancel;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod extractors;
pub mod join;
pub mod loader;
pub mod parser;
pub mod quiescence;
pub mod resolver;
pub mod runtime;
pub mod scanner;
pub mod snapshot;
pub mod state;
mod walker;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod tests;

pub use cancel::CancellationToken;
pub use config::{DEFAULT_EXTENSIONS, DEFAULT_MAX_CONCURRENCY, DEFAULT_SCRIPT_EXTENSIONS, ScanConfig};
pub use descriptor::{DEFAULT_MARKER, Descriptor, extract_descriptor, parse_descriptor};
pub use error::{IssueKind, ModuleError, ScanError, ScanIssue};
pub use join::{DiffRecord, DiffSource, JoinedRecord, join};
pub use resolver::{PathResolver, Resolution, ResolutionFailure};
pub use runtime::{FileMetadata, Runtime, RuntimeError, RuntimeResult};
pub use scanner::{ScanOutcome, Scanner, scan};
pub use snapshot::{GraphNode, GraphSnapshot};

#[cfg(not(target_family = "wasm"))]
pub use runtime::native::NativeRuntime;
