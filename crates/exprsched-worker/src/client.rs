//! Thin HTTP client around the `/internal/task` pull/complete protocol.

use reqwest::{Client, StatusCode};
use tracing::instrument;

use crate::error::WorkerError;
use crate::protocol::{CompletionBody, WireTask};

/// `GET /internal/task`. `Ok(None)` on 404 (nothing ready); any other
/// non-success status is an error.
#[instrument(skip(client))]
pub async fn pull_task(client: &Client, api_url: &str) -> Result<Option<WireTask>, WorkerError> {
    let response = client.get(api_url).send().await?;

    match response.status() {
        StatusCode::OK => Ok(Some(response.json::<WireTask>().await?)),
        StatusCode::NOT_FOUND => Ok(None),
        other => Err(WorkerError::UnexpectedStatus(other)),
    }
}

/// `POST /internal/task`.
#[instrument(skip(client, body))]
pub async fn post_result(client: &Client, api_url: &str, body: CompletionBody) -> Result<(), WorkerError> {
    let response = client.post(api_url).json(&body).send().await?;
    if response.status().is_success() {
        Ok(())
    } else {
        Err(WorkerError::UnexpectedStatus(response.status()))
    }
}
