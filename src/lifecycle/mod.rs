//! Process lifecycle: single-fire shutdown events, OS signal handling, and
//! the coordinator that ties the listener, scheduler and batches together.

mod coordinator;
pub mod shutdown;

pub use coordinator::{Coordinator, LifecycleState, ShutdownReport};
pub use shutdown::{
    forward_termination, shutdown_channel, ShutdownSignal, ShutdownTrigger, TerminationSignal,
    TerminationSignals,
};
