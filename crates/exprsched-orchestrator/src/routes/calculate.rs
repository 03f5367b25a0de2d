//! `POST /api/v1/calculate` (C3).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use exprsched_core::compiler::canonicalize;
use exprsched_core::submission::{self, SubmissionOutcome};
use tracing::instrument;

use crate::dto::{CalculateRequest, CalculateResponse};
use crate::extract::ValidatedJson;
use crate::http_error::ApiError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/calculate", post(calculate))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/calculate",
    request_body = CalculateRequest,
    responses(
        (status = 200, description = "Expression already submitted", body = CalculateResponse),
        (status = 201, description = "Expression accepted", body = CalculateResponse),
        (status = 422, description = "Expression failed to compile"),
        (status = 500, description = "Internal error"),
    )
)]
#[instrument(skip(state, payload))]
pub(crate) async fn calculate(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CalculateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Normalise before anything else touches the expression: whitespace
    // stripped, ',' replaced by '.' (§4.1), so "2 + 2" and "2+2" dedupe to
    // the same Expressions key and a space doesn't 422 out of the lexer.
    let canonical = canonicalize(&payload.expression);
    let outcome = submission::submit(state.store.as_ref(), &canonical).await?;

    match outcome {
        SubmissionOutcome::Created(id) => {
            Ok((StatusCode::CREATED, Json(CalculateResponse { id })))
        }
        SubmissionOutcome::AlreadyExists(id) => {
            Ok((StatusCode::OK, Json(CalculateResponse { id })))
        }
        SubmissionOutcome::InvalidExpression(err) => {
            Err(ApiError(exprsched_core::error::SchedulerError::InvalidExpression(err)))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::test_support::test_state;

    use super::*;

    async fn post(app: Router, body: &'static str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/calculate")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() { serde_json::Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, json)
    }

    #[tokio::test]
    async fn new_expression_is_created() {
        let app = router(test_state());
        let (status, body) = post(app, r#"{"expression":"2+2"}"#).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["id"].is_string());
    }

    #[tokio::test]
    async fn resubmitting_the_same_expression_dedupes() {
        let state = test_state();
        let (_, first) = post(router(state.clone()), r#"{"expression":"2 + 2"}"#).await;
        let (status, second) = post(router(state), r#"{"expression":"2+2"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["id"], second["id"]);
    }

    #[tokio::test]
    async fn invalid_expression_is_unprocessable() {
        let app = router(test_state());
        let (status, _) = post(app, r#"{"expression":"3$4"}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn whitespace_and_comma_are_normalised_before_compiling() {
        // "3 + 4 * 2" has a space, which the lexer alone would reject; the
        // handler must canonicalize before it ever reaches the compiler.
        let app = router(test_state());
        let (status, _) = post(app, r#"{"expression":"3 + 4 * 2"}"#).await;
        assert_eq!(status, StatusCode::CREATED);
    }
}
