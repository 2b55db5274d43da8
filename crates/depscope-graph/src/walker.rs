//! Concurrent claim-and-descend traversal.
//!
//! Each import edge becomes its own tokio task. A task resolves the
//! specifier, tries to claim the target in [`DepState`], and only the winner
//! loads, parses and walks the target. Every task records its edge, winner or
//! not, so the dependents set is complete regardless of scheduling order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use tokio::sync::Semaphore;
use tracing::Instrument;

use crate::cancel::CancellationToken;
use crate::descriptor::Descriptor;
use crate::error::{ModuleError, ScanIssue};
use crate::loader::ModuleLoader;
use crate::parser::{ImportKind, ImportSite, ParseFailure, ParsedModule, parse_module};
use crate::quiescence::{QuiescenceTracker, WorkGuard};
use crate::resolver::{PathResolver, Resolution};
use crate::runtime::Runtime;
use crate::state::DepState;

/// State shared by every task of one scan.
#[derive(Debug)]
pub(crate) struct WalkContext {
    pub runtime: Arc<dyn Runtime>,
    pub resolver: PathResolver,
    pub loader: ModuleLoader,
    pub state: DepState,
    pub tracker: Arc<QuiescenceTracker>,
    pub issues: Mutex<Vec<ScanIssue>>,
    pub limiter: Semaphore,
    pub cancel: CancellationToken,
    pub marker: Arc<str>,
    pub script_extensions: FxHashSet<String>,
    pub follow_dynamic_imports: bool,
    pub follow_reexports: bool,
}

impl WalkContext {
    fn is_script(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.script_extensions.contains(ext))
    }

    fn follows(&self, kind: ImportKind) -> bool {
        match kind {
            ImportKind::Static => true,
            ImportKind::Dynamic => self.follow_dynamic_imports,
            ImportKind::ReExport => self.follow_reexports,
        }
    }

    fn report(&self, issue: ScanIssue) {
        tracing::warn!("{}", issue);
        self.issues.lock().push(issue);
    }

    /// Load and parse one module, bounded by the concurrency limiter.
    ///
    /// Parsing is CPU-bound and runs on the blocking pool.
    pub async fn load_and_parse(&self, path: &Path) -> Result<ParsedModule, ModuleError> {
        let _permit = self.limiter.acquire().await.ok();

        let source = self.loader.load(path, self.runtime.as_ref()).await?;
        let marker = Arc::clone(&self.marker);
        let owned_path = path.to_path_buf();

        let parsed = tokio::task::spawn_blocking(move || {
            parse_module(&owned_path, &source, &marker)
        })
        .await
        .map_err(|err| ParseFailure {
            path: path.to_path_buf(),
            message: format!("parser task failed: {err}"),
        })??;

        Ok(parsed)
    }
}

/// Spawns one task per followed import of a module.
#[derive(Debug, Clone)]
pub(crate) struct GraphWalker {
    ctx: Arc<WalkContext>,
}

impl GraphWalker {
    pub fn new(ctx: Arc<WalkContext>) -> Self {
        Self { ctx }
    }

    /// Schedule a claim-and-descend task for each import of `owner`.
    ///
    /// Returns immediately. Repeated specifiers within one file are
    /// scheduled once.
    pub fn walk(&self, owner: &Path, imports: &[ImportSite]) {
        let mut scheduled = FxHashSet::default();

        for site in imports {
            if !self.ctx.follows(site.kind) || !scheduled.insert(site.specifier.as_str()) {
                continue;
            }

            let guard = self.ctx.tracker.schedule();
            let walker = self.clone();
            let owner = owner.to_path_buf();
            let specifier = site.specifier.clone();

            tokio::spawn(
                async move {
                    walker.claim_and_descend(owner, specifier, guard).await;
                }
                .in_current_span(),
            );
        }
    }

    async fn claim_and_descend(&self, owner: PathBuf, specifier: String, _guard: WorkGuard) {
        let ctx = &self.ctx;
        if ctx.cancel.is_cancelled() {
            return;
        }

        let target = match ctx
            .resolver
            .resolve(&owner, &specifier, ctx.runtime.as_ref())
            .await
        {
            Ok(Resolution::Resolved(target)) => {
                tracing::debug!("Resolved '{}' -> {}", specifier, target.display());
                target
            }
            Ok(Resolution::External) => {
                tracing::trace!("Skipping external import '{}'", specifier);
                return;
            }
            Err(failure) => {
                ctx.report(ScanIssue::from(failure));
                return;
            }
        };

        if ctx.state.claim(&target) {
            tracing::debug!("Claimed {}", target.display());
            if ctx.is_script(&target) {
                self.descend(&owner, &specifier, &target).await;
            } else {
                ctx.state.set_descriptor(&target, Descriptor::new());
            }
        }

        ctx.state.add_dependent(&target, &owner);
    }

    async fn descend(&self, owner: &Path, specifier: &str, target: &Path) {
        let ctx = &self.ctx;

        match ctx.load_and_parse(target).await {
            Ok(parsed) => {
                ctx.state.set_descriptor(target, parsed.descriptor);
                if !ctx.cancel.is_cancelled() {
                    self.walk(target, &parsed.imports);
                }
            }
            Err(err) => ctx.report(ScanIssue::module(
                owner.to_path_buf(),
                specifier.to_string(),
                target.to_path_buf(),
                &err,
            )),
        }
    }
}
