//! # Query Interface (C6)

use tracing::instrument;
use uuid::Uuid;

use crate::error::{SchedulerError, SchedulerResult};
use crate::model::{ExpressionStatus, ResultValue};
use crate::store::TaskStore;

/// One row of a list/get response: the expression's root id, its numeric
/// result (or `0.0` while pending/errored), and its status (§4.6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpressionView {
    pub id: Uuid,
    pub result: f64,
    pub status: ExpressionStatus,
}

impl From<(Uuid, ResultValue)> for ExpressionView {
    fn from((id, value): (Uuid, ResultValue)) -> Self {
        Self {
            id,
            result: value.numeric_or_zero(),
            status: value.status(),
        }
    }
}

/// `List`: every Results entry, in no particular order.
#[instrument(skip(store))]
pub async fn list(store: &dyn TaskStore) -> SchedulerResult<Vec<ExpressionView>> {
    let all = store.all_results().await?;
    Ok(all.into_iter().map(ExpressionView::from).collect())
}

/// `GetById`: a single expression's status, or `NotFound` if no Results
/// entry exists for it.
#[instrument(skip(store))]
pub async fn get_by_id(store: &dyn TaskStore, id: Uuid) -> SchedulerResult<ExpressionView> {
    let value = store
        .get_result(id)
        .await?
        .ok_or_else(|| SchedulerError::NotFound(format!("expression {id}")))?;
    Ok(ExpressionView::from((id, value)))
}
