//! Outstanding work tracking
//!
//! Every polling batch holds a [`WorkGuard`] for its whole lifetime. The
//! guard is acquired by the scheduler before the batch is spawned and
//! released when it is dropped, so early returns, fetch failures and panics
//! all give the slot back exactly once.

use std::sync::Arc;
use tokio::sync::watch;

/// Shared counter of in-flight batches with a wait-until-idle operation
#[derive(Debug, Clone)]
pub struct OutstandingWork {
    count: Arc<watch::Sender<usize>>,
}

impl OutstandingWork {
    /// Create a tracker with no outstanding work
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        Self {
            count: Arc::new(sender),
        }
    }

    /// Register one unit of work; it stays outstanding until the guard drops
    pub fn acquire(&self) -> WorkGuard {
        self.count.send_modify(|n| *n += 1);
        WorkGuard {
            count: Arc::clone(&self.count),
        }
    }

    /// Number of units currently outstanding
    pub fn count(&self) -> usize {
        *self.count.borrow()
    }

    /// Wait until no work is outstanding
    ///
    /// Returns immediately if the count is already zero. There is no timeout:
    /// a unit of work that never finishes keeps this pending forever.
    pub async fn wait_idle(&self) {
        let mut receiver = self.count.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait
        let _ = receiver.wait_for(|n| *n == 0).await;
    }
}

impl Default for OutstandingWork {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped registration of one unit of outstanding work
#[derive(Debug)]
#[must_use = "dropping the guard immediately releases the work slot"]
pub struct WorkGuard {
    count: Arc<watch::Sender<usize>>,
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        self.count.send_modify(|n| *n = n.saturating_sub(1));
    }
}

#[cfg(test)]
#[path = "outstanding_test.rs"]
mod tests;
