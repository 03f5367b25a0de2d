//! `GET /internal/task` and `POST /internal/task` — the worker-facing
//! pull/complete protocol (C4, C5).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use exprsched_core::completion::{self, CompletionPayload};
use exprsched_core::dispatch;
use exprsched_core::error::SchedulerError;
use tracing::instrument;

use crate::dto::{CompleteTaskRequest, CompleteTaskResponse, CompletionResultDto, TaskResponseDto};
use crate::extract::ValidatedJson;
use crate::http_error::ApiError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/internal/task", get(pull).post(post_result))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/internal/task",
    responses(
        (status = 200, description = "A ready task was dispatched", body = TaskResponseDto),
        (status = 404, description = "No ready task"),
        (status = 500, description = "Internal error"),
    )
)]
#[instrument(skip(state))]
pub(crate) async fn pull(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let dispatched = dispatch::get_task(state.store.as_ref(), &state.timings).await?;
    match dispatched {
        Some(task) => Ok((StatusCode::OK, Json(TaskResponseDto::from(task))).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

#[utoipa::path(
    post,
    path = "/internal/task",
    request_body = CompleteTaskRequest,
    responses(
        (status = 200, description = "Task result recorded", body = CompleteTaskResponse),
        (status = 404, description = "Unknown task id"),
        (status = 422, description = "Malformed body"),
        (status = 500, description = "Internal error"),
    )
)]
#[instrument(skip(state, payload))]
pub(crate) async fn post_result(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CompleteTaskRequest>,
) -> Result<Json<CompleteTaskResponse>, ApiError> {
    let CompleteTaskRequest { id, result } = payload;
    let payload = match result {
        CompletionResultDto::Value(v) => CompletionPayload::Value(v),
        CompletionResultDto::Sentinel(s) if s == "ERROR" => CompletionPayload::Error,
        CompletionResultDto::Sentinel(other) => {
            return Err(ApiError(SchedulerError::InvalidBody(format!(
                "result must be a number or the literal \"ERROR\", got {other:?}"
            ))))
        }
    };

    completion::complete(state.store.as_ref(), id, payload).await?;

    Ok(Json(CompleteTaskResponse {
        message: "task completed".to_string(),
        status: "ok".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use exprsched_core::submission;
    use tower::ServiceExt;

    use crate::test_support::test_state;

    use super::*;

    async fn call(app: Router, method: &str, body: Option<&'static str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri("/internal/task");
        let request = if let Some(body) = body {
            builder = builder.header("content-type", "application/json");
            builder.body(Body::from(body)).unwrap()
        } else {
            builder.body(Body::empty()).unwrap()
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() { serde_json::Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, json)
    }

    #[tokio::test]
    async fn pull_with_no_ready_task_is_not_found() {
        let app = router(test_state());
        let (status, _) = call(app, "GET", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn pull_returns_a_ready_task() {
        let state = test_state();
        submission::submit(state.store.as_ref(), "2+2").await.unwrap();

        let (status, body) = call(router(state), "GET", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["operation"], "+");
    }

    #[tokio::test]
    async fn post_result_with_numeric_value_completes_the_task() {
        let state = test_state();
        submission::submit(state.store.as_ref(), "2+2").await.unwrap();
        let (_, pulled) = call(router(state.clone()), "GET", None).await;
        let id = pulled["id"].as_str().unwrap();

        let body: &'static str = Box::leak(format!(r#"{{"id":"{id}","result":4.0}}"#).into_boxed_str());
        let (status, _) = call(router(state), "POST", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn post_result_with_unknown_sentinel_is_unprocessable() {
        let state = test_state();
        submission::submit(state.store.as_ref(), "2+2").await.unwrap();
        let (_, pulled) = call(router(state.clone()), "GET", None).await;
        let id = pulled["id"].as_str().unwrap();

        let body: &'static str = Box::leak(format!(r#"{{"id":"{id}","result":"WEIRD"}}"#).into_boxed_str());
        let (status, _) = call(router(state), "POST", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
