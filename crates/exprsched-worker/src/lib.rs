//! Worker process (C8): a pull-loop client for the arithmetic scheduler's
//! `/internal/task` protocol. No state of its own beyond an HTTP client.

pub mod client;
pub mod error;
pub mod pool;
pub mod protocol;
