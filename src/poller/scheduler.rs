//! Fixed-interval batch scheduler
//!
//! Fires one batch per period, first fire one full period after start.
//! Batches are spawned, never awaited here, so a slow batch does not delay
//! the next one and batches may overlap.

use super::batch::run_batch;
use super::fetcher::Fetcher;
use super::outstanding::OutstandingWork;
use crate::config::TargetList;
use crate::lifecycle::ShutdownSignal;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, info_span, Instrument};

pub struct Scheduler {
    period: Duration,
    targets: TargetList,
    fetcher: Arc<dyn Fetcher>,
    outstanding: OutstandingWork,
}

impl Scheduler {
    /// `period` must be non-zero
    pub fn new(
        period: Duration,
        targets: TargetList,
        fetcher: Arc<dyn Fetcher>,
        outstanding: OutstandingWork,
    ) -> Self {
        Self {
            period,
            targets,
            fetcher,
            outstanding,
        }
    }

    /// Start ticking until `stop` fires
    ///
    /// The handle resolves to the number of batches fired. Batches already
    /// launched keep running after the scheduler stops.
    pub fn spawn(self, stop: ShutdownSignal) -> JoinHandle<u64> {
        tokio::spawn(self.run(stop))
    }

    async fn run(self, mut stop: ShutdownSignal) -> u64 {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut fired = 0u64;
        loop {
            tokio::select! {
                // A pending stop always wins over a ready tick
                biased;
                _ = stop.wait() => break,
                _ = ticker.tick() => {
                    fired += 1;
                    self.launch(fired);
                }
            }
        }

        info!(batches = fired, "Scheduler stopped");
        fired
    }

    fn launch(&self, id: u64) {
        // Registered before the spawn so a concurrent drain always sees it
        let work = self.outstanding.acquire();
        let targets = self.targets.clone();
        let fetcher = Arc::clone(&self.fetcher);

        tokio::spawn(
            async move {
                run_batch(&targets, fetcher.as_ref(), work).await;
            }
            .instrument(info_span!("batch", id)),
        );
    }
}

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod tests;
