//! Startup and graceful shutdown orchestration
//!
//! Shutdown order once the signal fires:
//! 1. stop the scheduler (no new batches)
//! 2. stop the HTTP listener, bounded by `listener_shutdown_timeout`
//! 3. wait, without bound, for every outstanding batch to finish

use super::shutdown::{shutdown_channel, ShutdownSignal};
use crate::config::Config;
use crate::poller::{Fetcher, OutstandingWork, Scheduler};
use crate::server::{bind_listener, build_router, HttpServer, ListenerError, ReadinessState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

/// Where the coordinator is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Listener bound, nothing running yet
    Starting,
    Running,
    ShuttingDown,
    Stopped,
}

/// Summary returned once the coordinator reaches `Stopped`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    pub batches_scheduled: u64,
    pub listener_timed_out: bool,
}

pub struct Coordinator {
    config: Config,
    fetcher: Arc<dyn Fetcher>,
    listener: TcpListener,
    outstanding: OutstandingWork,
    readiness: ReadinessState,
    state: watch::Sender<LifecycleState>,
}

impl Coordinator {
    /// Bind the listener; the only fatal step of the lifecycle
    ///
    /// On error nothing has been started and `Running` is never entered.
    pub async fn bind(config: Config, fetcher: Arc<dyn Fetcher>) -> Result<Self, ListenerError> {
        let listener = bind_listener(config.listen_addr).await?;
        let (state, _) = watch::channel(LifecycleState::Starting);

        Ok(Self {
            config,
            fetcher,
            listener,
            outstanding: OutstandingWork::new(),
            readiness: ReadinessState::new(),
            state,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle on the in-flight batch counter
    pub fn outstanding(&self) -> OutstandingWork {
        self.outstanding.clone()
    }

    /// Watch lifecycle transitions
    pub fn state(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Serve and poll until `shutdown` fires, then drain and stop
    pub async fn run(self, mut shutdown: ShutdownSignal) -> ShutdownReport {
        let Coordinator {
            config,
            fetcher,
            listener,
            outstanding,
            readiness,
            state,
        } = self;

        let server = HttpServer::spawn(listener, build_router(readiness.clone()));

        let (scheduler_stop, scheduler_signal) = shutdown_channel();
        let scheduler = Scheduler::new(
            config.poll_interval,
            config.targets.clone(),
            fetcher,
            outstanding.clone(),
        )
        .spawn(scheduler_signal);

        readiness.set_ready();
        state.send_replace(LifecycleState::Running);
        info!(
            targets = config.targets.len(),
            interval_secs = config.poll_interval.as_secs_f64(),
            "Polling started"
        );

        shutdown.wait().await;

        info!("Shutting down gracefully...");
        state.send_replace(LifecycleState::ShuttingDown);
        readiness.set_not_ready();

        scheduler_stop.trigger();
        let batches_scheduled = match scheduler.await {
            Ok(fired) => fired,
            Err(e) => {
                warn!(error = %e, "Scheduler task panicked");
                0
            }
        };

        let listener_timed_out = match server.shutdown(config.listener_shutdown_timeout).await {
            Ok(()) => false,
            Err(e) => {
                warn!(error = %e, "Listener shutdown failed");
                true
            }
        };

        let pending = outstanding.count();
        if pending > 0 {
            info!(batches = pending, "Waiting for outstanding batches");
        }
        outstanding.wait_idle().await;

        state.send_replace(LifecycleState::Stopped);
        info!("Server gracefully stopped");

        ShutdownReport {
            batches_scheduled,
            listener_timed_out,
        }
    }
}

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod tests;
