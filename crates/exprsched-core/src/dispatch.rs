//! # Dispatch / Resolution Engine (C4)
//!
//! Drives the DAG forward in response to worker pulls. No background loop:
//! every scheduling decision happens synchronously within one `GetTask` call.

use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::error::SchedulerResult;
use crate::model::{InternalTask, Operation, ResultValue, TaskArg, TaskResult};
use crate::store::TaskStore;

/// What a worker receives from a successful pull: the two resolved operands,
/// the operator, and the per-operator artificial latency budget.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskResponse {
    pub id: Uuid,
    pub arg1: f64,
    pub arg2: f64,
    pub operation: Operation,
    pub operation_time_ms: u64,
}

/// Per-operator latency configuration (§6).
#[derive(Debug, Clone, Copy)]
pub struct OperationTimings {
    pub addition_ms: u64,
    pub subtraction_ms: u64,
    pub multiplication_ms: u64,
    pub division_ms: u64,
}

impl Default for OperationTimings {
    fn default() -> Self {
        Self {
            addition_ms: 1000,
            subtraction_ms: 1000,
            multiplication_ms: 1000,
            division_ms: 1000,
        }
    }
}

impl OperationTimings {
    pub fn for_operation(&self, op: Operation) -> u64 {
        match op {
            Operation::Add => self.addition_ms,
            Operation::Subtract => self.subtraction_ms,
            Operation::Multiply => self.multiplication_ms,
            Operation::Divide => self.division_ms,
        }
    }
}

/// Resolve one operand of `task`. Returns `Ok(Some(value))` once ready,
/// `Ok(None)` if it is a literal or not yet resolvable, and `Err` only for
/// store I/O failures — never for an unresolved reference, which is a
/// perfectly normal outcome of this scan.
enum Resolution {
    /// Either a literal, or a reference whose target resolved to a number.
    Ready(f64),
    /// A reference whose target is still pending/processing.
    NotReady,
    /// A reference whose target errored.
    Errored,
}

async fn resolve_arg(store: &dyn TaskStore, arg: TaskArg) -> SchedulerResult<Resolution> {
    match arg {
        TaskArg::Literal(v) => Ok(Resolution::Ready(v)),
        TaskArg::Ref(ref_id) => {
            let referenced = store.get_task(ref_id).await?;
            match referenced {
                None => {
                    // §3 invariant 3 says this can't happen in a well-formed
                    // DAG; treat it defensively as "not ready" rather than
                    // propagating an internal error into the scan.
                    warn!(%ref_id, "dangling task reference during resolution");
                    Ok(Resolution::NotReady)
                }
                Some(referenced) => match referenced.result {
                    TaskResult::Pending | TaskResult::Processing => Ok(Resolution::NotReady),
                    TaskResult::Error => Ok(Resolution::Errored),
                    TaskResult::Value(v) => Ok(Resolution::Ready(v)),
                },
            }
        }
    }
}

/// Mark `task` and, if it is a root, its Results entry, as errored.
async fn propagate_error(store: &dyn TaskStore, mut task: InternalTask) -> SchedulerResult<()> {
    task.result = TaskResult::Error;
    store.set_task(&task).await?;
    if store.get_result(task.id).await?.is_some() {
        store.set_result(task.id, ResultValue::Error).await?;
    }
    Ok(())
}

/// Run one `GetTask` scan: find the first ready task, dispatch it, and
/// propagate any newly-discovered errors along the way. Returns `None` when
/// nothing is ready (`NotFound` per the HTTP contract).
#[instrument(skip(store, timings))]
pub async fn get_task(
    store: &dyn TaskStore,
    timings: &OperationTimings,
) -> SchedulerResult<Option<TaskResponse>> {
    let ids = store.all_task_ids().await?;

    for id in ids {
        let Some(task) = store.get_task(id).await? else {
            continue;
        };
        if task.result != TaskResult::Pending {
            continue;
        }

        let first = resolve_arg(store, task.arg1).await?;
        let second = resolve_arg(store, task.arg2).await?;

        let errored = matches!(first, Resolution::Errored) || matches!(second, Resolution::Errored);
        if errored {
            propagate_error(store, task).await?;
            debug!(task_id = %id, "task errored via operand propagation");
            continue;
        }

        let (Resolution::Ready(arg1), Resolution::Ready(arg2)) = (first, second) else {
            continue;
        };

        let mut dispatched = task.clone();
        dispatched.result = TaskResult::Processing;
        store.set_task(&dispatched).await?;

        debug!(task_id = %id, operation = task.operation.as_str(), "task dispatched");
        return Ok(Some(TaskResponse {
            id,
            arg1,
            arg2,
            operation: task.operation,
            operation_time_ms: timings.for_operation(task.operation),
        }));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InternalTask;
    use crate::store::InMemoryTaskStore;

    #[tokio::test]
    async fn dispatches_a_ready_literal_only_task() {
        let store = InMemoryTaskStore::new();
        let task = InternalTask::new(
            Uuid::new_v4(),
            TaskArg::Literal(2.0),
            TaskArg::Literal(2.0),
            Operation::Add,
        );
        store.set_task(&task).await.unwrap();

        let response = get_task(&store, &OperationTimings::default()).await.unwrap().unwrap();
        assert_eq!(response.arg1, 2.0);
        assert_eq!(response.arg2, 2.0);
        assert_eq!(response.operation, Operation::Add);
        assert_eq!(response.operation_time_ms, 1000);

        let reloaded = store.get_task(task.id).await.unwrap().unwrap();
        assert_eq!(reloaded.result, TaskResult::Processing);
    }

    #[tokio::test]
    async fn skips_already_dispatched_tasks() {
        let store = InMemoryTaskStore::new();
        let mut task = InternalTask::new(
            Uuid::new_v4(),
            TaskArg::Literal(1.0),
            TaskArg::Literal(1.0),
            Operation::Add,
        );
        task.result = TaskResult::Processing;
        store.set_task(&task).await.unwrap();

        let response = get_task(&store, &OperationTimings::default()).await.unwrap();
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn withholds_tasks_whose_dependency_is_not_yet_resolved() {
        let store = InMemoryTaskStore::new();
        let dependency = InternalTask::new(
            Uuid::new_v4(),
            TaskArg::Literal(4.0),
            TaskArg::Literal(2.0),
            Operation::Multiply,
        );
        let dependent = InternalTask::new(
            Uuid::new_v4(),
            TaskArg::Literal(3.0),
            TaskArg::Ref(dependency.id),
            Operation::Add,
        );
        store.set_task(&dependency).await.unwrap();
        store.set_task(&dependent).await.unwrap();

        // Only the dependency is ready; the dependent must not be dispatched yet.
        let response = get_task(&store, &OperationTimings::default()).await.unwrap().unwrap();
        assert_eq!(response.id, dependency.id);

        // Second pull: dependency is now PROCESSING, dependent still blocked.
        let response = get_task(&store, &OperationTimings::default()).await.unwrap();
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn dispatches_dependent_once_dependency_resolves_to_a_number() {
        let store = InMemoryTaskStore::new();
        let mut dependency = InternalTask::new(
            Uuid::new_v4(),
            TaskArg::Literal(4.0),
            TaskArg::Literal(2.0),
            Operation::Multiply,
        );
        dependency.result = TaskResult::Value(8.0);
        let dependent = InternalTask::new(
            Uuid::new_v4(),
            TaskArg::Literal(3.0),
            TaskArg::Ref(dependency.id),
            Operation::Add,
        );
        store.set_task(&dependency).await.unwrap();
        store.set_task(&dependent).await.unwrap();

        let response = get_task(&store, &OperationTimings::default()).await.unwrap().unwrap();
        assert_eq!(response.id, dependent.id);
        assert_eq!(response.arg1, 3.0);
        assert_eq!(response.arg2, 8.0);
    }

    #[tokio::test]
    async fn propagates_error_through_dependent_and_into_results() {
        let store = InMemoryTaskStore::new();
        let mut dependency = InternalTask::new(
            Uuid::new_v4(),
            TaskArg::Literal(1.0),
            TaskArg::Literal(0.0),
            Operation::Divide,
        );
        dependency.result = TaskResult::Error;
        let dependent = InternalTask::new(
            Uuid::new_v4(),
            TaskArg::Literal(3.0),
            TaskArg::Ref(dependency.id),
            Operation::Add,
        );
        store.set_task(&dependency).await.unwrap();
        store.set_task(&dependent).await.unwrap();
        // Pretend `dependent` is the root: give it a Results entry.
        store.set_result(dependent.id, ResultValue::Processing).await.unwrap();

        // The scan finds `dependent` is not ready because its dependency
        // errored; it flips to ERROR in place and the scan continues,
        // reporting NotFound since nothing else is dispatchable.
        let response = get_task(&store, &OperationTimings::default()).await.unwrap();
        assert!(response.is_none());

        let reloaded = store.get_task(dependent.id).await.unwrap().unwrap();
        assert_eq!(reloaded.result, TaskResult::Error);

        let result = store.get_result(dependent.id).await.unwrap().unwrap();
        assert_eq!(result, ResultValue::Error);
    }

    #[tokio::test]
    async fn no_ready_task_returns_none() {
        let store = InMemoryTaskStore::new();
        let response = get_task(&store, &OperationTimings::default()).await.unwrap();
        assert!(response.is_none());
    }
}
