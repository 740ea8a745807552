//! Target polling
//!
//! - `fetcher` - one GET against one target
//! - `batch` - one sequential, fail-fast sweep over the target list
//! - `scheduler` - fires a batch every period
//! - `outstanding` - tracks in-flight batches so shutdown can drain them

pub mod batch;
pub mod fetcher;
pub mod outstanding;
pub mod scheduler;

pub use batch::{run_batch, BatchReport};
pub use fetcher::{FetchError, Fetcher, HttpFetcher};
pub use outstanding::{OutstandingWork, WorkGuard};
pub use scheduler::Scheduler;
