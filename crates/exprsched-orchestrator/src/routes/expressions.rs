//! `GET /api/v1/expressions` and `GET /api/v1/expressions/{id}` (C6).

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use exprsched_core::error::SchedulerError;
use exprsched_core::query;
use tracing::instrument;
use uuid::Uuid;

use crate::dto::{ExpressionDto, ExpressionListResponse, ExpressionResponse};
use crate::http_error::ApiError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/expressions", get(list))
        .route("/api/v1/expressions/{id}", get(get_by_id))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/expressions",
    responses((status = 200, description = "All submitted expressions", body = ExpressionListResponse))
)]
#[instrument(skip(state))]
pub(crate) async fn list(State(state): State<AppState>) -> Result<Json<ExpressionListResponse>, ApiError> {
    let views = query::list(state.store.as_ref()).await?;
    Ok(Json(ExpressionListResponse {
        expressions: views.into_iter().map(ExpressionDto::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/expressions/{id}",
    params(("id" = Uuid, Path, description = "Expression root id")),
    responses(
        (status = 200, description = "Expression status", body = ExpressionResponse),
        (status = 404, description = "No such expression"),
        (status = 422, description = "Path segment is not a valid UUID"),
    )
)]
#[instrument(skip(state))]
pub(crate) async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExpressionResponse>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(SchedulerError::InvalidUuid)?;
    let view = query::get_by_id(state.store.as_ref(), id).await?;
    Ok(Json(ExpressionResponse {
        expression: ExpressionDto::from(view),
    }))
}
