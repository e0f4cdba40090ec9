//! Durable document checkpoints.

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::Mutex;
use tracing::debug;

use sforge_models::{ProjectId, ScriptDocument};

use crate::error::StoreResult;

/// Durable save/load of the whole script document.
///
/// `save` stamps `meta.updated_at` and returns the stamped document so the
/// caller's in-memory copy carries the same timestamp that was persisted.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn save(&self, document: &ScriptDocument) -> StoreResult<ScriptDocument>;
    async fn load(&self) -> StoreResult<Option<ScriptDocument>>;
}

/// Redis-backed store: one fixed key per project, overwrite-only JSON value.
pub struct RedisScriptStore {
    client: redis::Client,
    key: String,
}

impl RedisScriptStore {
    /// Create a new store for a project.
    pub fn new(redis_url: &str, project_id: &ProjectId) -> StoreResult<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self {
            client,
            key: Self::document_key(project_id),
        })
    }

    /// Create a store from the `REDIS_URL` environment variable.
    pub fn from_env(project_id: &ProjectId) -> StoreResult<Self> {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());
        Self::new(&url, project_id)
    }

    /// Key the document lives under.
    pub fn document_key(project_id: &ProjectId) -> String {
        format!("script:{project_id}")
    }
}

#[async_trait]
impl StateStore for RedisScriptStore {
    async fn save(&self, document: &ScriptDocument) -> StoreResult<ScriptDocument> {
        let mut stamped = document.clone();
        stamped.touch();

        let payload = serde_json::to_string(&stamped)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        debug!(key = %self.key, bytes = payload.len(), "Saving script document");
        conn.set::<_, _, ()>(&self.key, payload).await?;

        Ok(stamped)
    }

    async fn load(&self) -> StoreResult<Option<ScriptDocument>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = conn.get(&self.key).await?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

/// In-memory store used by tests and local dry runs.
#[derive(Default)]
pub struct MemoryScriptStore {
    inner: Mutex<Option<ScriptDocument>>,
}

impl MemoryScriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last document checkpointed, if any.
    pub async fn saved(&self) -> Option<ScriptDocument> {
        self.inner.lock().await.clone()
    }
}

#[async_trait]
impl StateStore for MemoryScriptStore {
    async fn save(&self, document: &ScriptDocument) -> StoreResult<ScriptDocument> {
        let mut stamped = document.clone();
        stamped.touch();
        *self.inner.lock().await = Some(stamped.clone());
        Ok(stamped)
    }

    async fn load(&self) -> StoreResult<Option<ScriptDocument>> {
        Ok(self.inner.lock().await.clone())
    }
}
