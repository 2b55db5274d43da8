//! Scan orchestration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use path_clean::PathClean;
use tokio::sync::Semaphore;
use tracing::Instrument;

use crate::cancel::CancellationToken;
use crate::config::ScanConfig;
use crate::error::{ModuleError, ScanError, ScanIssue};
use crate::loader::ModuleLoader;
use crate::quiescence::QuiescenceTracker;
use crate::resolver::PathResolver;
use crate::runtime::Runtime;
use crate::snapshot::GraphSnapshot;
use crate::state::DepState;
use crate::walker::{GraphWalker, WalkContext};

/// Result of a completed scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub snapshot: GraphSnapshot,

    /// Non-fatal problems, ordered by importer then specifier
    pub issues: Vec<ScanIssue>,
}

/// Builds the reverse dependency graph reachable from an entry file.
///
/// # Example
///
/// ```rust,no_run
/// use depscope_graph::{ScanConfig, Scanner};
///
/// # async fn example() -> Result<(), depscope_graph::ScanError> {
/// let config = ScanConfig::new("/path/to/repo", "src/main.js")
///     .external(["vue", "vue-router"])
///     .alias("@views", "src/views");
///
/// let outcome = Scanner::new(config).scan().await?;
/// println!("{} reachable files", outcome.snapshot.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Scanner {
    config: ScanConfig,
    runtime: Option<Arc<dyn Runtime>>,
    cancel: CancellationToken,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            runtime: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Use a specific runtime instead of the native filesystem.
    pub fn runtime(mut self, runtime: Arc<dyn Runtime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Share a cancellation token with the caller.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Run the scan to completion.
    ///
    /// Only entry-level problems are fatal. Anything that goes wrong below the
    /// entry is recorded as a [`ScanIssue`] and that branch stops there.
    pub async fn scan(self) -> Result<ScanOutcome, ScanError> {
        let span = tracing::info_span!("scan", entry = %self.config.entry.display());
        self.run().instrument(span).await
    }

    async fn run(self) -> Result<ScanOutcome, ScanError> {
        self.config.validate().map_err(ScanError::InvalidConfig)?;
        let runtime = self.resolve_runtime()?;

        let root = Self::resolve_root(&self.config.root, runtime.as_ref()).await?;
        let entry_path = root.join(&self.config.entry).clean();
        if runtime.metadata(&entry_path).await.is_err() {
            return Err(ScanError::EntryNotFound(entry_path));
        }
        let entry = runtime
            .canonicalize(&entry_path)
            .await
            .unwrap_or(entry_path);

        tracing::info!("Scanning from {}", entry.display());

        let (tracker, root_guard) = QuiescenceTracker::begin();
        let ctx = Arc::new(WalkContext {
            resolver: PathResolver::new(&self.config, &root),
            loader: ModuleLoader,
            state: DepState::new(),
            tracker: Arc::clone(&tracker),
            issues: Mutex::new(Vec::new()),
            limiter: Semaphore::new(self.config.max_concurrency),
            cancel: self.cancel.clone(),
            marker: Arc::from(self.config.marker.as_str()),
            script_extensions: self.config.script_extensions.iter().cloned().collect(),
            follow_dynamic_imports: self.config.follow_dynamic_imports,
            follow_reexports: self.config.follow_reexports,
            runtime,
        });

        let parsed = ctx.load_and_parse(&entry).await.map_err(|err| match err {
            ModuleError::Load(err) => ScanError::EntryLoad(err),
            ModuleError::Parse(err) => ScanError::EntryParse(err),
        })?;

        ctx.state.claim(&entry);
        ctx.state.set_descriptor(&entry, parsed.descriptor);
        GraphWalker::new(Arc::clone(&ctx)).walk(&entry, &parsed.imports);

        drop(root_guard);
        tracker.wait_idle().await;

        if self.cancel.is_cancelled() {
            tracing::info!("Scan cancelled");
            return Err(ScanError::Cancelled);
        }

        let snapshot = ctx.state.snapshot(&root, &entry);
        let mut issues = std::mem::take(&mut *ctx.issues.lock());
        issues.sort_by(|a, b| {
            (&a.importer, &a.specifier, a.kind).cmp(&(&b.importer, &b.specifier, b.kind))
        });

        tracing::info!(
            "Scan finished: {} files, {} issues",
            snapshot.len(),
            issues.len()
        );

        Ok(ScanOutcome { snapshot, issues })
    }

    fn resolve_runtime(&self) -> Result<Arc<dyn Runtime>, ScanError> {
        if let Some(runtime) = &self.runtime {
            return Ok(Arc::clone(runtime));
        }

        #[cfg(not(target_family = "wasm"))]
        {
            Ok(Arc::new(crate::runtime::native::NativeRuntime))
        }

        #[cfg(target_family = "wasm")]
        {
            Err(ScanError::InvalidConfig(
                "a runtime must be supplied on this platform".to_string(),
            ))
        }
    }

    async fn resolve_root(root: &Path, runtime: &dyn Runtime) -> Result<PathBuf, ScanError> {
        let absolute = if root.is_absolute() {
            root.to_path_buf()
        } else {
            runtime.get_cwd()?.join(root)
        };

        runtime
            .canonicalize(&absolute)
            .await
            .map_err(|source| ScanError::RootNotFound {
                path: absolute,
                source,
            })
    }
}

/// Scan with the native runtime and no external cancellation.
pub async fn scan(config: ScanConfig) -> Result<ScanOutcome, ScanError> {
    Scanner::new(config).scan().await
}
