//! alive: a liveness-polling service
//!
//! Polls the URLs configured through `ALIVE_*` environment variables every
//! few seconds, serves a small HTTP surface, and drains in-flight polling
//! batches before exiting on SIGTERM/SIGINT.

pub mod config;
pub mod lifecycle;
pub mod poller;
pub mod server;
