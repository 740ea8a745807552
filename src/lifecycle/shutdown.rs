//! Shutdown signalling
//!
//! Two layers:
//! - `TerminationSignals` observes SIGTERM/SIGINT from the OS
//! - `shutdown_channel()` is the in-process single-fire event that components
//!   wait on (the coordinator, the scheduler loop, the HTTP listener)

use std::fmt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

/// Receiving side of a single-fire shutdown event
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    receiver: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Wait until shutdown is triggered
    ///
    /// Also returns if the trigger is dropped without firing, since nothing
    /// could ever fire it afterwards.
    pub async fn wait(&mut self) {
        let _ = self.receiver.wait_for(|fired| *fired).await;
    }

    /// Check if shutdown was triggered (non-blocking)
    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow()
    }
}

/// Sending side of a single-fire shutdown event
#[derive(Debug)]
pub struct ShutdownTrigger {
    sender: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Fire the event
    ///
    /// Returns `true` only for the call that actually fired it; later calls
    /// are no-ops and wake nobody.
    pub fn trigger(&self) -> bool {
        let fired = self.sender.send_if_modified(|fired| {
            if *fired {
                false
            } else {
                *fired = true;
                true
            }
        });
        if fired {
            info!("Shutdown requested");
        }
        fired
    }
}

/// Create a new shutdown event
///
/// The signal half can be cloned and handed to every component that needs
/// to observe it.
pub fn shutdown_channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (sender, receiver) = watch::channel(false);
    (ShutdownTrigger { sender }, ShutdownSignal { receiver })
}

/// OS termination request that starts a graceful shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    Interrupt,
    Terminate,
}

impl TerminationSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationSignal::Interrupt => "SIGINT",
            TerminationSignal::Terminate => "SIGTERM",
        }
    }
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Installed SIGTERM/SIGINT handlers
///
/// Installing replaces the default terminate action for the rest of the
/// process lifetime, so a second signal during shutdown is swallowed.
#[cfg(unix)]
pub struct TerminationSignals {
    sigterm: tokio::signal::unix::Signal,
    sigint: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl TerminationSignals {
    /// Register the handlers; fails on OS resource exhaustion
    pub fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            sigterm: signal(SignalKind::terminate())?,
            sigint: signal(SignalKind::interrupt())?,
        })
    }

    /// Wait for the next termination request
    pub async fn recv(&mut self) -> TerminationSignal {
        tokio::select! {
            _ = self.sigterm.recv() => TerminationSignal::Terminate,
            _ = self.sigint.recv() => TerminationSignal::Interrupt,
        }
    }
}

/// Ctrl+C handling (non-unix)
#[cfg(not(unix))]
pub struct TerminationSignals {
    _private: (),
}

#[cfg(not(unix))]
impl TerminationSignals {
    pub fn install() -> std::io::Result<Self> {
        Ok(Self { _private: () })
    }

    pub async fn recv(&mut self) -> TerminationSignal {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to wait for Ctrl+C");
            std::future::pending::<()>().await;
        }
        TerminationSignal::Interrupt
    }
}

/// Fire `trigger` on the first termination request
pub fn forward_termination(
    mut signals: TerminationSignals,
    trigger: ShutdownTrigger,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let signal = signals.recv().await;
        info!(signal = %signal, "Received termination signal");
        trigger.trigger();
        // Keep the handlers installed; later signals are drained and ignored
        loop {
            let signal = signals.recv().await;
            info!(signal = %signal, "Already shutting down, ignoring signal");
        }
    })
}

#[cfg(test)]
#[path = "shutdown_test.rs"]
mod tests;
