//! Startup configuration
//!
//! Everything here is read once at process start:
//! - `ALIVE_*` - each variable's value is one polling target
//! - `POLL_FETCH_TIMEOUT_SECS` - optional per-fetch timeout (default: unbounded)

use std::ffi::OsString;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Prefix of the environment variables whose values are polling targets
pub const TARGET_ENV_PREFIX: &str = "ALIVE_";

/// Optional per-fetch timeout in seconds
pub const FETCH_TIMEOUT_ENV: &str = "POLL_FETCH_TIMEOUT_SECS";

/// Port the hello/probe listener binds to (IPv4 wildcard address)
pub const HTTP_PORT: u16 = 8001;

/// Period between two polling batches
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Upper bound for draining in-flight HTTP requests on shutdown
pub const LISTENER_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid POLL_FETCH_TIMEOUT_SECS value {0:?}: expected a positive number of seconds")]
    InvalidFetchTimeout(String),
}

/// Ordered, immutable list of URLs polled on every tick
///
/// Cloning is cheap; every batch shares the same backing slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetList {
    urls: Arc<[String]>,
}

impl TargetList {
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls: urls.into() }
    }

    /// Collect the values of all `ALIVE_*` variables, keeping iteration order
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut urls = Vec::new();
        for (name, value) in vars {
            let Some(name) = name.to_str() else {
                continue;
            };
            if !name.starts_with(TARGET_ENV_PREFIX) {
                continue;
            }
            match value.into_string() {
                Ok(url) => urls.push(url),
                Err(_) => warn!(variable = %name, "Skipping target with non-UTF-8 value"),
            }
        }
        Self::new(urls)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }
}

impl Default for TargetList {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<S: Into<String>> FromIterator<S> for TargetList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Process-wide settings, fixed at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub targets: TargetList,
    pub listen_addr: SocketAddr,
    pub poll_interval: Duration,
    pub listener_shutdown_timeout: Duration,
    /// `None` keeps fetches unbounded
    pub fetch_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets: TargetList::default(),
            listen_addr: SocketAddr::from(([0, 0, 0, 0], HTTP_PORT)),
            poll_interval: POLL_INTERVAL,
            listener_shutdown_timeout: LISTENER_SHUTDOWN_TIMEOUT,
            fetch_timeout: None,
        }
    }
}

impl Config {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars_os())
    }

    /// Build the configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let vars: Vec<(OsString, OsString)> = vars.into_iter().collect();

        let fetch_timeout = vars
            .iter()
            .find(|(name, _)| name == FETCH_TIMEOUT_ENV)
            .map(|(_, value)| parse_fetch_timeout(value))
            .transpose()?;

        Ok(Self {
            targets: TargetList::from_vars(vars),
            fetch_timeout,
            ..Self::default()
        })
    }
}

fn parse_fetch_timeout(value: &OsString) -> Result<Duration, ConfigError> {
    let raw = value.to_string_lossy();
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidFetchTimeout(raw.into_owned())),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
