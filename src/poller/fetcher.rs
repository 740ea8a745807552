//! Single-target HTTP fetch
//!
//! A fetch is one GET with no retry. Any status code counts as a successful
//! fetch here; only transport-level failures are errors.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("http error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // Walk the source chain so the log line names the root cause
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }

        if err.is_builder() {
            FetchError::InvalidUrl(message)
        } else if err.is_timeout() {
            FetchError::Timeout(message)
        } else if err.is_connect() {
            FetchError::Connect(message)
        } else {
            FetchError::Http(message)
        }
    }
}

/// Trait for fetching one target
///
/// Production code uses `HttpFetcher`. Tests script outcomes per URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<StatusCode, FetchError>;
}

/// Fetcher backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher; `timeout` of `None` leaves requests unbounded
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<StatusCode, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        // Body is never read; dropping the response closes it
        drop(response);
        Ok(status)
    }
}

/// Mock fetcher for testing - records calls and scripts outcomes
#[cfg(test)]
pub struct MockFetcher {
    failing: Vec<String>,
    calls: std::sync::Mutex<Vec<String>>,
    gate: Option<tokio::sync::Semaphore>,
}

#[cfg(test)]
impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
impl MockFetcher {
    /// Every fetch succeeds with 200
    pub fn new() -> Self {
        Self {
            failing: Vec::new(),
            calls: std::sync::Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Fetches of the given URLs fail with a connect error
    pub fn failing_on(urls: &[&str]) -> Self {
        Self {
            failing: urls.iter().map(|u| u.to_string()).collect(),
            ..Self::new()
        }
    }

    /// Every fetch hangs until `release()` is called
    pub fn gated() -> Self {
        Self {
            gate: Some(tokio::sync::Semaphore::new(0)),
            ..Self::new()
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.close();
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, url: &str) {
        self.calls.lock().unwrap().push(url.to_string());
    }
}

#[cfg(test)]
#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<StatusCode, FetchError> {
        self.record(url);

        if let Some(gate) = &self.gate {
            // Closing the semaphore wakes every waiter
            let _ = gate.acquire().await;
        }

        if self.failing.iter().any(|f| f == url) {
            Err(FetchError::Connect(format!("{}: connection refused", url)))
        } else {
            Ok(StatusCode::OK)
        }
    }
}

#[cfg(test)]
#[path = "fetcher_test.rs"]
mod tests;
