//! # Submission Handler (C3)

use tracing::{info, instrument};
use uuid::Uuid;

use crate::compiler::{self, CompileError, CompiledExpression};
use crate::error::SchedulerResult;
use crate::model::ResultValue;
use crate::store::TaskStore;

/// Outcome of a submission, mapped to HTTP status by the API layer (§6: 200/201/422).
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Created(Uuid),
    AlreadyExists(Uuid),
    InvalidExpression(CompileError),
}

/// Submit a canonical expression: dedupe, compile, persist the DAG (or
/// short-circuit a bare literal directly into Results), and return the
/// root UUID.
#[instrument(skip(store))]
pub async fn submit(store: &dyn TaskStore, canonical: &str) -> SchedulerResult<SubmissionOutcome> {
    if let Some(existing) = store.get_expression(canonical).await? {
        return Ok(SubmissionOutcome::AlreadyExists(existing));
    }

    let mut tasks = match compiler::compile(canonical) {
        // Bare-literal short-circuit (§4.1 edge case, resolved per §9): a
        // literal with no operator — whether plain ("42") or parenthesized
        // ("(5)") — never enters the Tasks namespace at all. This arm is
        // reached from the same parse that would otherwise build the task
        // DAG, so there's no separate raw-string check to fall out of sync
        // with what the compiler actually accepts.
        Ok(CompiledExpression::Literal(value)) => {
            let root_id = Uuid::new_v4();
            store.set_expression(canonical, root_id).await?;
            store.set_result(root_id, ResultValue::Number(value)).await?;
            info!(%root_id, canonical, "bare literal short-circuited to Results");
            return Ok(SubmissionOutcome::Created(root_id));
        }
        Ok(CompiledExpression::Tasks(tasks)) => tasks,
        Err(e) => return Ok(SubmissionOutcome::InvalidExpression(e)),
    };

    let root_id = Uuid::new_v4();
    store.set_expression(canonical, root_id).await?;
    store.set_result(root_id, ResultValue::Processing).await?;

    // Root-ID stamping: the last emitted task is the root (§4.1).
    if let Some(last) = tasks.last_mut() {
        last.id = root_id;
    }

    for task in &tasks {
        store.set_task(task).await?;
    }

    info!(%root_id, canonical, task_count = tasks.len(), "expression submitted");
    Ok(SubmissionOutcome::Created(root_id))
}
