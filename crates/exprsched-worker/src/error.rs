use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("request to orchestrator failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status from orchestrator: {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}
