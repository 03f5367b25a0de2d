//! Maps [`SchedulerError`] onto the HTTP status taxonomy of §7.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use exprsched_core::error::{SchedulerError, StatusClass};
use serde::Serialize;
use tracing::{error, warn};

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

/// Wraps [`SchedulerError`] so we can implement a foreign trait
/// ([`IntoResponse`]) on it without violating the orphan rule.
pub struct ApiError(pub SchedulerError);

impl From<SchedulerError> for ApiError {
    fn from(err: SchedulerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.status_class() {
            StatusClass::UserInput => StatusCode::UNPROCESSABLE_ENTITY,
            StatusClass::NotFound => StatusCode::NOT_FOUND,
            StatusClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match status {
            StatusCode::INTERNAL_SERVER_ERROR => error!(error = %self.0, "request failed"),
            StatusCode::NOT_FOUND => warn!(error = %self.0, "not found"),
            _ => warn!(error = %self.0, "rejected"),
        }

        let body = ErrorBody {
            message: self.0.to_string(),
        };
        (status, axum::Json(body)).into_response()
    }
}
