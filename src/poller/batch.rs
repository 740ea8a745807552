//! One polling sweep over the target list
//!
//! Targets are fetched sequentially in list order. The first failed fetch
//! ends the sweep: later targets wait for the next tick.

use super::fetcher::Fetcher;
use super::outstanding::WorkGuard;
use crate::config::TargetList;
use tracing::{debug, info, warn};

/// What a single batch did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Fetches issued, including the failing one
    pub attempted: usize,
    pub succeeded: usize,
    /// Target whose failure ended the batch early
    pub aborted_at: Option<String>,
}

/// Run one batch over `targets`
///
/// `work` is the outstanding-work registration for this batch. It is held
/// until the function returns, whatever path it returns on.
pub async fn run_batch(targets: &TargetList, fetcher: &dyn Fetcher, work: WorkGuard) -> BatchReport {
    let _work = work;
    let mut report = BatchReport::default();

    for url in targets.iter() {
        report.attempted += 1;
        match fetcher.fetch(url).await {
            Ok(status) => {
                report.succeeded += 1;
                info!(url = %url, status = status.as_u16(), "Fetched URL");
            }
            Err(error) => {
                warn!(url = %url, error = %error, "Error fetching URL, skipping rest of batch");
                report.aborted_at = Some(url.to_string());
                break;
            }
        }
    }

    if !targets.is_empty() {
        debug!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            "Batch finished"
        );
    }
    report
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;
