//! Worker binary: builds an HTTP client sized to `POWER`, spawns the pull
//! loop pool, and waits for a shutdown signal.

use std::time::Duration;

use clap::Parser;
use exprsched_core::config::WorkerConfig;
use exprsched_core::logging;
use exprsched_worker::pool::{self, DEFAULT_TICK_MS};
use tokio::signal;
use tracing::info;

/// Command-line overrides for the environment-loaded worker configuration.
#[derive(Debug, Parser)]
#[command(name = "exprsched-worker", about = "Pull-loop worker for the arithmetic expression scheduler")]
struct Cli {
    /// Overrides POWER: number of concurrent pull loops.
    #[arg(long)]
    power: Option<u32>,

    /// Overrides API_URL: the orchestrator's /internal/task endpoint.
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    logging::init_tracing();

    let cli = Cli::parse();
    let mut config = WorkerConfig::from_env().map_err(|e| format!("invalid configuration: {e}"))?;
    if let Some(power) = cli.power {
        config.power = power;
    }
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }

    info!(api_url = %config.api_url, power = config.power, "starting exprsched worker");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(config.power as usize)
        .build()?;

    let pool = pool::spawn(client, config.api_url.clone(), config.power, DEFAULT_TICK_MS);

    shutdown_signal().await;
    info!("shutdown signal received, stopping pull loops");

    pool.shutdown(Duration::from_secs(10)).await;

    info!("worker shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C"),
        _ = terminate => info!("received SIGTERM"),
    }
}
