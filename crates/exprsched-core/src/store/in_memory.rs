//! In-process [`TaskStore`] backed by `Arc<RwLock<HashMap<..>>>`.
//!
//! Default backend: used whenever `REDIS_URL` is not configured, and in
//! every unit test in this crate. The three namespaces are kept as three
//! separate maps under one lock rather than one map with prefixed keys —
//! the logical separation from §4.2 costs nothing to keep explicit here.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use super::TaskStore;
use crate::error::SchedulerResult;
use crate::model::{InternalTask, ResultValue};

#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    expressions: RwLock<HashMap<String, Uuid>>,
    results: RwLock<HashMap<Uuid, ResultValue>>,
    tasks: RwLock<HashMap<Uuid, InternalTask>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> crate::error::SchedulerError {
        crate::error::SchedulerError::Store("in-memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn get_expression(&self, canonical: &str) -> SchedulerResult<Option<Uuid>> {
        let guard = self.expressions.read().map_err(|_| Self::poisoned())?;
        Ok(guard.get(canonical).copied())
    }

    async fn set_expression(&self, canonical: &str, root_id: Uuid) -> SchedulerResult<()> {
        let mut guard = self.expressions.write().map_err(|_| Self::poisoned())?;
        guard.insert(canonical.to_string(), root_id);
        Ok(())
    }

    async fn get_result(&self, id: Uuid) -> SchedulerResult<Option<ResultValue>> {
        let guard = self.results.read().map_err(|_| Self::poisoned())?;
        Ok(guard.get(&id).copied())
    }

    async fn set_result(&self, id: Uuid, value: ResultValue) -> SchedulerResult<()> {
        let mut guard = self.results.write().map_err(|_| Self::poisoned())?;
        guard.insert(id, value);
        Ok(())
    }

    async fn all_results(&self) -> SchedulerResult<Vec<(Uuid, ResultValue)>> {
        let guard = self.results.read().map_err(|_| Self::poisoned())?;
        Ok(guard.iter().map(|(id, value)| (*id, *value)).collect())
    }

    async fn get_task(&self, id: Uuid) -> SchedulerResult<Option<InternalTask>> {
        let guard = self.tasks.read().map_err(|_| Self::poisoned())?;
        Ok(guard.get(&id).cloned())
    }

    async fn set_task(&self, task: &InternalTask) -> SchedulerResult<()> {
        let mut guard = self.tasks.write().map_err(|_| Self::poisoned())?;
        guard.insert(task.id, task.clone());
        Ok(())
    }

    async fn all_task_ids(&self) -> SchedulerResult<Vec<Uuid>> {
        let guard = self.tasks.read().map_err(|_| Self::poisoned())?;
        Ok(guard.keys().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Operation, TaskArg};

    #[tokio::test]
    async fn expression_roundtrip() {
        let store = InMemoryTaskStore::new();
        assert_eq!(store.get_expression("2+2").await.unwrap(), None);

        let id = Uuid::new_v4();
        store.set_expression("2+2", id).await.unwrap();
        assert_eq!(store.get_expression("2+2").await.unwrap(), Some(id));
    }

    #[tokio::test]
    async fn result_roundtrip_and_listing() {
        let store = InMemoryTaskStore::new();
        let id = Uuid::new_v4();
        store.set_result(id, ResultValue::Processing).await.unwrap();
        assert_eq!(store.get_result(id).await.unwrap(), Some(ResultValue::Processing));

        store.set_result(id, ResultValue::Number(4.0)).await.unwrap();
        assert_eq!(store.get_result(id).await.unwrap(), Some(ResultValue::Number(4.0)));

        let all = store.all_results().await.unwrap();
        assert_eq!(all, vec![(id, ResultValue::Number(4.0))]);
    }

    #[tokio::test]
    async fn task_roundtrip_and_enumeration() {
        let store = InMemoryTaskStore::new();
        let task = InternalTask::new(
            Uuid::new_v4(),
            TaskArg::Literal(2.0),
            TaskArg::Literal(2.0),
            Operation::Add,
        );
        store.set_task(&task).await.unwrap();

        let loaded = store.get_task(task.id).await.unwrap().unwrap();
        assert_eq!(loaded, task);

        let ids = store.all_task_ids().await.unwrap();
        assert_eq!(ids, vec![task.id]);
    }

    #[tokio::test]
    async fn missing_keys_return_none_not_error() {
        let store = InMemoryTaskStore::new();
        assert_eq!(store.get_task(Uuid::new_v4()).await.unwrap(), None);
        assert_eq!(store.get_result(Uuid::new_v4()).await.unwrap(), None);
        assert_eq!(store.get_expression("nope").await.unwrap(), None);
    }
}
