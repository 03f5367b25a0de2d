//! # Scheduler Error Types
//!
//! Unified error handling for the expression compiler, task store, and the
//! dispatch/resolution/completion engines.

use thiserror::Error;

/// Result type used throughout the scheduler core.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Errors surfaced by the scheduler core.
///
/// Runtime arithmetic failures (division by zero, worker timeout, unknown
/// operator) are deliberately **not** represented here — those propagate as
/// data, via [`crate::model::TaskResult::Error`], not as a Rust `Err`.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid expression: {0}")]
    InvalidExpression(#[from] crate::compiler::CompileError),

    #[error("expression or task not found: {0}")]
    NotFound(String),

    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("malformed request body: {0}")]
    InvalidBody(String),

    #[error("missing or incorrect Content-Type: expected application/json")]
    InvalidContentType,

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("task store error: {0}")]
    Store(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl SchedulerError {
    /// HTTP status class this error maps to, per the error taxonomy.
    pub fn status_class(&self) -> StatusClass {
        match self {
            SchedulerError::InvalidExpression(_)
            | SchedulerError::InvalidJson(_)
            | SchedulerError::InvalidBody(_)
            | SchedulerError::InvalidContentType
            | SchedulerError::InvalidUuid(_) => StatusClass::UserInput,
            SchedulerError::NotFound(_) => StatusClass::NotFound,
            SchedulerError::Store(_) | SchedulerError::Internal(_) => StatusClass::Internal,
        }
    }
}

/// Error taxonomy classes from the error handling design (§7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    UserInput,
    NotFound,
    Internal,
}
