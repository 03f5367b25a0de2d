//! # Task Store (C2)
//!
//! A thin abstraction over three independent key-value namespaces
//! (Expressions, Results, Tasks). Each operation is atomic at the
//! single-key level; no multi-key transactions are required.
//!
//! `Option::None` represents `Missing`, a distinct non-error condition
//! callers discriminate against generic I/O failure (`Err`).

pub mod in_memory;
#[cfg(feature = "cache-redis")]
pub mod redis_store;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::SchedulerResult;
use crate::model::{InternalTask, ResultValue};

pub use in_memory::InMemoryTaskStore;
#[cfg(feature = "cache-redis")]
pub use redis_store::RedisTaskStore;

/// Storage-agnostic abstraction over the three key-spaces of §3/§4.2.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Expressions[canonical] -> root task UUID.
    async fn get_expression(&self, canonical: &str) -> SchedulerResult<Option<Uuid>>;
    async fn set_expression(&self, canonical: &str, root_id: Uuid) -> SchedulerResult<()>;

    /// Results[root_id] -> sentinel or numeric value.
    async fn get_result(&self, id: Uuid) -> SchedulerResult<Option<ResultValue>>;
    async fn set_result(&self, id: Uuid, value: ResultValue) -> SchedulerResult<()>;
    /// Every `(id, value)` pair currently in Results, for the list query (C6).
    async fn all_results(&self) -> SchedulerResult<Vec<(Uuid, ResultValue)>>;

    /// Tasks[id] -> the task record.
    async fn get_task(&self, id: Uuid) -> SchedulerResult<Option<InternalTask>>;
    async fn set_task(&self, task: &InternalTask) -> SchedulerResult<()>;
    /// Full enumeration of task IDs, used only by the Dispatch Engine's scan
    /// (§4.4 step 1). Iteration order is unspecified.
    async fn all_task_ids(&self) -> SchedulerResult<Vec<Uuid>>;
}
