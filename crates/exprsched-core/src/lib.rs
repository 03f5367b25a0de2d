//! # exprsched-core
//!
//! Expression compiler, task store, and dispatch/resolution engine for the
//! distributed arithmetic scheduler. This crate has no HTTP or process
//! concerns of its own — [`crate::submission`], [`crate::dispatch`],
//! [`crate::completion`] and [`crate::query`] are the four operations the
//! orchestrator's HTTP layer wraps directly.
//!
//! ## Module map
//!
//! - [`compiler`] — infix-to-DAG compilation (C1)
//! - [`store`] — the Expressions/Results/Tasks key-value abstraction (C2)
//! - [`submission`] — `POST /api/v1/calculate` (C3)
//! - [`dispatch`] — `GET /internal/task` (C4)
//! - [`completion`] — `POST /internal/task` (C5)
//! - [`query`] — `GET /api/v1/expressions[...]` (C6)
//! - [`config`] — environment-driven configuration (C9)
//! - [`logging`] — shared tracing setup (C10)

pub mod compiler;
pub mod completion;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod model;
pub mod query;
pub mod store;
pub mod submission;

pub use error::{SchedulerError, SchedulerResult};
