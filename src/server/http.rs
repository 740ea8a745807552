//! HTTP listener: hello responder and probes
//!
//! - `/` - Always "Hello World" (also the fallback for unknown paths)
//! - `/healthz` - Liveness: Is the process alive?
//! - `/readyz` - Readiness: 200 while running, 503 once shutdown begins

use crate::lifecycle::{shutdown_channel, ShutdownTrigger};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{any, get},
    Router,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("failed to bind listener on {addr}: {source}")]
    Start {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("in-flight requests did not finish within {0:?}, listener forced closed")]
    ShutdownTimeout(Duration),
}

/// Shared readiness flag
///
/// Set once the coordinator is running, cleared as soon as shutdown starts
/// so probes stop routing traffic here.
#[derive(Debug, Clone, Default)]
pub struct ReadinessState {
    ready: Arc<AtomicBool>,
}

impl ReadinessState {
    /// Create a new readiness state (initially not ready)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ready(&self) {
        self.ready.store(true, Ordering::SeqCst);
    }

    pub fn set_not_ready(&self) {
        self.ready.store(false, Ordering::SeqCst);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

async fn hello() -> &'static str {
    "Hello World"
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn readyz(State(readiness): State<ReadinessState>) -> StatusCode {
    if readiness.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Build the router for the hello and probe endpoints
pub fn build_router(readiness: ReadinessState) -> Router {
    Router::new()
        .route("/", any(hello))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .fallback(hello)
        .with_state(readiness)
}

/// Bind the listener socket
///
/// Failure here is fatal for the process: nothing else has started yet.
pub async fn bind_listener(addr: SocketAddr) -> Result<TcpListener, ListenerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ListenerError::Start { addr, source })?;
    let local = listener.local_addr().unwrap_or(addr);
    info!(addr = %local, "HTTP listener bound");
    Ok(listener)
}

/// Running HTTP listener
pub struct HttpServer {
    task: JoinHandle<std::io::Result<()>>,
    stop: ShutdownTrigger,
}

impl HttpServer {
    /// Serve `router` on `listener` in the background until `shutdown()`
    pub fn spawn(listener: TcpListener, router: Router) -> Self {
        let (stop, mut signal) = shutdown_channel();

        let task = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move { signal.wait().await })
                .await;
            if let Err(e) = &result {
                error!(error = %e, "HTTP listener failed");
            }
            result
        });

        Self { task, stop }
    }

    /// Stop accepting connections and drain in-flight requests
    ///
    /// Waits at most `timeout`; past that the listener task is aborted and
    /// `ListenerError::ShutdownTimeout` is returned.
    pub async fn shutdown(self, timeout: Duration) -> Result<(), ListenerError> {
        let Self { mut task, stop } = self;
        stop.trigger();

        match tokio::time::timeout(timeout, &mut task).await {
            // Serve errors were logged by the task itself
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => {
                warn!(error = %e, "HTTP listener task panicked");
                Ok(())
            }
            Err(_) => {
                task.abort();
                Err(ListenerError::ShutdownTimeout(timeout))
            }
        }
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
