//! The pull-loop worker pool (§4.8).
//!
//! A single ticker feeds a shared, bounded channel at a fixed period; `POWER`
//! independent loops race to receive a tick and attempt one pull each time
//! they win one, so across the whole pool at most one pull is attempted per
//! tick. Each loop computes its task under a timeout equal to the
//! orchestrator-supplied `operation_time` and always reports back, even on
//! failure, with the `"ERROR"` sentinel.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::{mpsc, Mutex, Notify};
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::{post_result, pull_task};
use crate::protocol::{CompletionBody, CompletionResult, WireTask};

/// Default tick period between task-pull attempts (§6).
pub const DEFAULT_TICK_MS: u64 = 100;

/// A running pool: join handles for the ticker and every pull loop, plus the
/// signal used to stop spawning new pulls (in-flight ones are left to finish).
pub struct Pool {
    pub handles: Vec<tokio::task::JoinHandle<()>>,
    shutdown: Arc<Notify>,
}

impl Pool {
    /// Stop the ticker and let every pull loop drain its current tick, then
    /// wait (bounded by `grace`) for all tasks to exit.
    pub async fn shutdown(self, grace: Duration) {
        self.shutdown.notify_waiters();
        let _ = tokio::time::timeout(grace, join_all_handles(self.handles)).await;
    }
}

async fn join_all_handles(handles: Vec<tokio::task::JoinHandle<()>>) {
    for handle in handles {
        let _ = handle.await;
    }
}

/// Spawn the central ticker and `power` pull loops.
pub fn spawn(client: Client, api_url: String, power: u32, tick_ms: u64) -> Pool {
    let (tx, rx) = mpsc::channel::<()>(1);
    let rx = Arc::new(Mutex::new(rx));
    let shutdown = Arc::new(Notify::new());

    let mut handles = vec![tokio::spawn(run_ticker(tx, tick_ms, Arc::clone(&shutdown)))];

    for worker_id in 0..power {
        let client = client.clone();
        let api_url = api_url.clone();
        let rx = Arc::clone(&rx);
        let shutdown = Arc::clone(&shutdown);
        handles.push(tokio::spawn(run_pull_loop(worker_id, client, api_url, rx, shutdown)));
    }

    Pool { handles, shutdown }
}

async fn run_ticker(tx: mpsc::Sender<()>, tick_ms: u64, shutdown: Arc<Notify>) {
    let mut interval = tokio::time::interval(Duration::from_millis(tick_ms));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                // A full channel means a pull is already in flight; drop
                // the tick rather than block the ticker.
                let _ = tx.try_send(());
            }
            _ = shutdown.notified() => {
                info!("ticker stopped, no further pulls will be attempted");
                return;
            }
        }
    }
}

async fn run_pull_loop(
    worker_id: u32,
    client: Client,
    api_url: String,
    rx: Arc<Mutex<mpsc::Receiver<()>>>,
    shutdown: Arc<Notify>,
) {
    loop {
        let tick = tokio::select! {
            tick = async { rx.lock().await.recv().await } => tick,
            _ = shutdown.notified() => {
                info!(worker_id, "pull loop draining before shutdown");
                None
            }
        };

        let Some(()) = tick else {
            info!(worker_id, "pull loop stopped");
            return;
        };

        match pull_task(&client, &api_url).await {
            Ok(Some(task)) => execute_task(&client, &api_url, task).await,
            Ok(None) => debug!(worker_id, "no ready task"),
            Err(err) => warn!(worker_id, error = %err, "pull failed"),
        }
    }
}

async fn execute_task(client: &Client, api_url: &str, task: WireTask) {
    let task_id = task.id;
    let budget = Duration::from_millis(task.operation_time);

    let result = match timeout(budget, async { task.compute() }).await {
        Ok(Ok(value)) => CompletionResult::Value(value),
        Ok(Err(compute_err)) => {
            warn!(%task_id, error = ?compute_err, "task computation failed");
            CompletionResult::error()
        }
        Err(_) => {
            warn!(%task_id, timeout_ms = task.operation_time, "task timed out");
            CompletionResult::error()
        }
    };

    report(client, api_url, task_id, result).await;
}

async fn report(client: &Client, api_url: &str, task_id: Uuid, result: CompletionResult) {
    let body = CompletionBody { id: task_id, result };
    if let Err(err) = post_result(client, api_url, body).await {
        warn!(%task_id, error = %err, "failed to report task result");
    }
}
