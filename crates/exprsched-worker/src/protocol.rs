//! Wire types for the worker -> orchestrator pull/complete protocol (§6).
//! Deliberately separate from `exprsched_core::model` — the worker only
//! ever sees the flattened HTTP shape, never the internal DAG types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct WireTask {
    pub id: Uuid,
    pub arg1: f64,
    pub arg2: f64,
    pub operation: String,
    pub operation_time: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeError {
    DivisionByZero,
    UnknownOperation,
    Timeout,
}

impl WireTask {
    /// Compute `arg1 op arg2`, guarding against division by zero and an
    /// unrecognized operator (§4.8). Never panics on worker input.
    pub fn compute(&self) -> Result<f64, ComputeError> {
        match self.operation.as_str() {
            "+" => Ok(self.arg1 + self.arg2),
            "-" => Ok(self.arg1 - self.arg2),
            "*" => Ok(self.arg1 * self.arg2),
            "/" => {
                if self.arg2 == 0.0 {
                    Err(ComputeError::DivisionByZero)
                } else {
                    Ok(self.arg1 / self.arg2)
                }
            }
            _ => Err(ComputeError::UnknownOperation),
        }
    }
}

/// Either a numeric result or the `"ERROR"` sentinel posted back to
/// `/internal/task`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CompletionResult {
    Value(f64),
    Sentinel(&'static str),
}

impl CompletionResult {
    pub fn error() -> Self {
        CompletionResult::Sentinel("ERROR")
    }
}

#[derive(Debug, Serialize)]
pub struct CompletionBody {
    pub id: Uuid,
    pub result: CompletionResult,
}
