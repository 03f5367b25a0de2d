//! # Completion Handler (C5)

use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{SchedulerError, SchedulerResult};
use crate::model::{ResultValue, TaskResult};
use crate::store::TaskStore;

/// A worker-submitted outcome: either a numeric value or the `"ERROR"` sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompletionPayload {
    Value(f64),
    Error,
}

impl From<CompletionPayload> for TaskResult {
    fn from(payload: CompletionPayload) -> Self {
        match payload {
            CompletionPayload::Value(v) => TaskResult::Value(v),
            CompletionPayload::Error => TaskResult::Error,
        }
    }
}

impl From<CompletionPayload> for ResultValue {
    fn from(payload: CompletionPayload) -> Self {
        match payload {
            CompletionPayload::Value(v) => ResultValue::Number(v),
            CompletionPayload::Error => ResultValue::Error,
        }
    }
}

/// Record a worker's completion of `task_id`. Overwrites the task's result
/// unconditionally, then — only if a Results entry already exists for this
/// id (i.e. it is a root) — overwrites that entry too (§4.5).
#[instrument(skip(store))]
pub async fn complete(
    store: &dyn TaskStore,
    task_id: Uuid,
    payload: CompletionPayload,
) -> SchedulerResult<()> {
    let mut task = store
        .get_task(task_id)
        .await?
        .ok_or_else(|| SchedulerError::NotFound(format!("task {task_id}")))?;

    task.result = payload.into();
    store.set_task(&task).await?;

    if store.get_result(task_id).await?.is_some() {
        store.set_result(task_id, payload.into()).await?;
        info!(%task_id, "root task completed, Results updated");
    } else {
        info!(%task_id, "non-root task completed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InternalTask, Operation, TaskArg};
    use crate::store::InMemoryTaskStore;

    #[tokio::test]
    async fn completing_a_root_task_updates_both_task_and_results() {
        let store = InMemoryTaskStore::new();
        let task = InternalTask::new(
            Uuid::new_v4(),
            TaskArg::Literal(2.0),
            TaskArg::Literal(2.0),
            Operation::Add,
        );
        store.set_task(&task).await.unwrap();
        store.set_result(task.id, ResultValue::Processing).await.unwrap();

        complete(&store, task.id, CompletionPayload::Value(4.0)).await.unwrap();

        let reloaded = store.get_task(task.id).await.unwrap().unwrap();
        assert_eq!(reloaded.result, TaskResult::Value(4.0));

        let result = store.get_result(task.id).await.unwrap().unwrap();
        assert_eq!(result, ResultValue::Number(4.0));
    }

    #[tokio::test]
    async fn completing_a_non_root_task_leaves_results_untouched() {
        let store = InMemoryTaskStore::new();
        let task = InternalTask::new(
            Uuid::new_v4(),
            TaskArg::Literal(2.0),
            TaskArg::Literal(3.0),
            Operation::Add,
        );
        store.set_task(&task).await.unwrap();
        // No Results entry for this id: it's a non-root subtask.

        complete(&store, task.id, CompletionPayload::Value(5.0)).await.unwrap();

        assert_eq!(store.get_result(task.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn completing_with_error_sentinel_propagates_to_results() {
        let store = InMemoryTaskStore::new();
        let task = InternalTask::new(
            Uuid::new_v4(),
            TaskArg::Literal(1.0),
            TaskArg::Literal(0.0),
            Operation::Divide,
        );
        store.set_task(&task).await.unwrap();
        store.set_result(task.id, ResultValue::Processing).await.unwrap();

        complete(&store, task.id, CompletionPayload::Error).await.unwrap();

        let result = store.get_result(task.id).await.unwrap().unwrap();
        assert_eq!(result, ResultValue::Error);
    }

    #[tokio::test]
    async fn completing_unknown_task_is_not_found() {
        let store = InMemoryTaskStore::new();
        let err = complete(&store, Uuid::new_v4(), CompletionPayload::Value(1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulerError::NotFound(_)));
    }

    #[tokio::test]
    async fn completing_twice_with_same_payload_is_idempotent() {
        let store = InMemoryTaskStore::new();
        let task = InternalTask::new(
            Uuid::new_v4(),
            TaskArg::Literal(2.0),
            TaskArg::Literal(2.0),
            Operation::Add,
        );
        store.set_task(&task).await.unwrap();
        store.set_result(task.id, ResultValue::Processing).await.unwrap();

        complete(&store, task.id, CompletionPayload::Value(4.0)).await.unwrap();
        complete(&store, task.id, CompletionPayload::Value(4.0)).await.unwrap();

        let result = store.get_result(task.id).await.unwrap().unwrap();
        assert_eq!(result, ResultValue::Number(4.0));
    }
}
