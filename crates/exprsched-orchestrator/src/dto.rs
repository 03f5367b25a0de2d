//! Request/response bodies for the HTTP API. Kept separate from
//! [`exprsched_core::model`] so the wire shape can evolve independently of
//! the core domain types.

use exprsched_core::query::ExpressionView;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CalculateRequest {
    /// Infix arithmetic expression, e.g. `"(2+3)*4"`.
    pub expression: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CalculateResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExpressionDto {
    pub id: Uuid,
    pub result: f64,
    pub status: String,
}

impl From<ExpressionView> for ExpressionDto {
    fn from(view: ExpressionView) -> Self {
        Self {
            id: view.id,
            result: view.result,
            status: view.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExpressionListResponse {
    pub expressions: Vec<ExpressionDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExpressionResponse {
    pub expression: ExpressionDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskResponseDto {
    pub id: Uuid,
    pub arg1: f64,
    pub arg2: f64,
    pub operation: String,
    pub operation_time: u64,
}

impl From<exprsched_core::dispatch::TaskResponse> for TaskResponseDto {
    fn from(response: exprsched_core::dispatch::TaskResponse) -> Self {
        Self {
            id: response.id,
            arg1: response.arg1,
            arg2: response.arg2,
            operation: response.operation.as_str().to_string(),
            operation_time: response.operation_time_ms,
        }
    }
}

/// Either a numeric result or the `"ERROR"` sentinel, as posted back by a worker.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CompletionResultDto {
    Value(f64),
    Sentinel(String),
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CompleteTaskRequest {
    pub id: Uuid,
    pub result: CompletionResultDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompleteTaskResponse {
    pub message: String,
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
}
