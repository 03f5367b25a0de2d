//! Redis-backed [`TaskStore`], selected when `REDIS_URL` is configured.
//!
//! Mirrors this system's deployment ancestor, which persisted all three
//! namespaces as separate Redis clients; here they share one connection
//! with a namespaced key prefix per §9's re-architecture guidance
//! ("three separate key-spaces can be unified ... prefix").

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use uuid::Uuid;

use super::TaskStore;
use crate::error::{SchedulerError, SchedulerResult};
use crate::model::{InternalTask, ResultValue};

const EXPR_PREFIX: &str = "exprsched:expr:";
const RESULT_PREFIX: &str = "exprsched:result:";
const TASK_PREFIX: &str = "exprsched:task:";

pub struct RedisTaskStore {
    conn: ConnectionManager,
}

impl RedisTaskStore {
    pub async fn connect(redis_url: &str) -> SchedulerResult<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| SchedulerError::Store(format!("invalid redis url: {e}")))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| SchedulerError::Store(format!("redis connection failed: {e}")))?;
        Ok(Self { conn })
    }

    fn store_err(e: redis::RedisError) -> SchedulerError {
        SchedulerError::Store(e.to_string())
    }
}

#[async_trait]
impl TaskStore for RedisTaskStore {
    async fn get_expression(&self, canonical: &str) -> SchedulerResult<Option<Uuid>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(format!("{EXPR_PREFIX}{canonical}"))
            .await
            .map_err(Self::store_err)?;
        raw.map(|s| Uuid::parse_str(&s).map_err(SchedulerError::from))
            .transpose()
    }

    async fn set_expression(&self, canonical: &str, root_id: Uuid) -> SchedulerResult<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(format!("{EXPR_PREFIX}{canonical}"), root_id.to_string())
            .await
            .map_err(Self::store_err)
    }

    async fn get_result(&self, id: Uuid) -> SchedulerResult<Option<ResultValue>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(format!("{RESULT_PREFIX}{id}"))
            .await
            .map_err(Self::store_err)?;
        Ok(raw.as_deref().map(ResultValue::from_store_string))
    }

    async fn set_result(&self, id: Uuid, value: ResultValue) -> SchedulerResult<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(format!("{RESULT_PREFIX}{id}"), value.to_store_string())
            .await
            .map_err(Self::store_err)
    }

    async fn all_results(&self) -> SchedulerResult<Vec<(Uuid, ResultValue)>> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn
            .keys(format!("{RESULT_PREFIX}*"))
            .await
            .map_err(Self::store_err)?;
        let mut out = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(id_str) = key.strip_prefix(RESULT_PREFIX) else {
                continue;
            };
            let Ok(id) = Uuid::parse_str(id_str) else {
                continue;
            };
            let raw: Option<String> = conn.get(&key).await.map_err(Self::store_err)?;
            if let Some(raw) = raw {
                out.push((id, ResultValue::from_store_string(&raw)));
            }
        }
        Ok(out)
    }

    async fn get_task(&self, id: Uuid) -> SchedulerResult<Option<InternalTask>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(format!("{TASK_PREFIX}{id}"))
            .await
            .map_err(Self::store_err)?;
        raw.map(|s| serde_json::from_str(&s).map_err(SchedulerError::from))
            .transpose()
    }

    async fn set_task(&self, task: &InternalTask) -> SchedulerResult<()> {
        let mut conn = self.conn.clone();
        let payload = serde_json::to_string(task)?;
        conn.set::<_, _, ()>(format!("{TASK_PREFIX}{}", task.id), payload)
            .await
            .map_err(Self::store_err)
    }

    async fn all_task_ids(&self) -> SchedulerResult<Vec<Uuid>> {
        let mut conn = self.conn.clone();
        // Mirrors this system's ancestor, which scanned with `Keys(ctx, "*")`
        // rather than a cursor-based SCAN; acceptable per §5 ("workload is
        // assumed small").
        let keys: Vec<String> = conn
            .keys(format!("{TASK_PREFIX}*"))
            .await
            .map_err(Self::store_err)?;
        Ok(keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(TASK_PREFIX).and_then(|id| Uuid::parse_str(id).ok()))
            .collect())
    }
}
