//! Orchestration Server
//!
//! Thin wrapper binary: load configuration, build the task store, serve the
//! HTTP API with graceful shutdown.

use std::sync::Arc;

use exprsched_core::config::OrchestratorConfig;
use exprsched_core::logging;
use exprsched_core::store::{InMemoryTaskStore, TaskStore};
use exprsched_orchestrator::state::AppState;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    logging::init_tracing();

    info!("Starting exprsched orchestrator...");
    info!("   Version: {}", env!("CARGO_PKG_VERSION"));

    let config = OrchestratorConfig::from_env().map_err(|e| format!("invalid configuration: {e}"))?;

    let store: Arc<dyn TaskStore> = if let Some(redis_url) = &config.redis_url {
        info!(redis_url, "using Redis-backed task store");
        Arc::new(exprsched_core::store::RedisTaskStore::connect(redis_url).await?)
    } else {
        info!("using in-process task store");
        Arc::new(InMemoryTaskStore::new())
    };

    let state = AppState::new(store, config.timings.into());
    let app = exprsched_orchestrator::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(bind_addr = %config.bind_addr, "listening");
    info!("   Swagger UI: http://{}/swagger-ui", config.bind_addr);
    info!("   Press Ctrl+C to shutdown gracefully");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!(error = %e, "server error");
            e
        })?;

    info!("Orchestrator shutdown complete");
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
