use alive::config::Config;
use alive::lifecycle::{forward_termination, shutdown_channel, Coordinator, TerminationSignals};
use alive::poller::HttpFetcher;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting alive poller");

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    if config.targets.is_empty() {
        warn!("No ALIVE_* targets configured - batches will be empty");
    }
    for url in config.targets.iter() {
        info!(url = %url, "Polling target");
    }
    match config.fetch_timeout {
        Some(timeout) => info!(timeout_secs = timeout.as_secs(), "Fetch timeout configured"),
        None => info!("No fetch timeout - a hung target delays shutdown"),
    }

    let fetcher = HttpFetcher::new(config.fetch_timeout)?;

    // Install handlers before serving so an early SIGTERM is not lost
    let signals = TerminationSignals::install()?;
    let (trigger, shutdown) = shutdown_channel();

    let coordinator = match Coordinator::bind(config, Arc::new(fetcher)).await {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Failed to start HTTP listener");
            return Err(e.into());
        }
    };

    let _signal_task = forward_termination(signals, trigger);

    let report = coordinator.run(shutdown).await;
    info!(
        batches = report.batches_scheduled,
        listener_timed_out = report.listener_timed_out,
        "Shutdown complete"
    );
    Ok(())
}
