//! Completion detection for the fan-out walk.
//!
//! Every scheduled unit of work holds a [`WorkGuard`]. The pending count only
//! reaches zero once no guard is alive, and new guards are only created by
//! code already holding one, so zero is final.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;

#[derive(Debug)]
pub struct QuiescenceTracker {
    pending: AtomicUsize,
    idle: Notify,
}

impl QuiescenceTracker {
    /// New tracker seeded with one unit of work, returned as the root guard.
    pub fn begin() -> (Arc<Self>, WorkGuard) {
        let tracker = Arc::new(Self {
            pending: AtomicUsize::new(1),
            idle: Notify::new(),
        });
        let guard = WorkGuard {
            tracker: Arc::clone(&tracker),
        };
        (tracker, guard)
    }

    /// Register one more unit of work.
    pub fn schedule(self: &Arc<Self>) -> WorkGuard {
        self.pending.fetch_add(1, Ordering::AcqRel);
        WorkGuard {
            tracker: Arc::clone(self),
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Wait until every guard has been dropped.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }

    fn settle(&self) {
        if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.idle.notify_one();
        }
    }
}

/// Outstanding unit of work. Dropping it settles the work, including on panic.
#[derive(Debug)]
pub struct WorkGuard {
    tracker: Arc<QuiescenceTracker>,
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        self.tracker.settle();
    }
}
