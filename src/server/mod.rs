//! HTTP surface of the poller
//!
//! Serves the "Hello World" responder plus Kubernetes-style probes:
//! - `/healthz` - Liveness probe (process is running)
//! - `/readyz` - Readiness probe (coordinator is running, not shutting down)

mod http;

pub use http::{bind_listener, build_router, HttpServer, ListenerError, ReadinessState};
