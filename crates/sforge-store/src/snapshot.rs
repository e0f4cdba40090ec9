//! Snapshot events via Redis Pub/Sub.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use sforge_models::{PipelineEvent, ProjectId};

use crate::error::StoreResult;

/// Where the pipeline pushes caller-facing progress.
///
/// Publishing must never fail a run; callers log and drop the error.
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    async fn publish(&self, event: &PipelineEvent) -> StoreResult<()>;
}

/// Channel for publishing/subscribing to pipeline events.
pub struct SnapshotChannel {
    client: redis::Client,
    project_id: ProjectId,
}

impl SnapshotChannel {
    /// Create a new snapshot channel.
    pub fn new(redis_url: &str, project_id: ProjectId) -> StoreResult<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client, project_id })
    }

    /// Get the channel name for a project.
    pub fn channel_name(project_id: &ProjectId) -> String {
        format!("pipeline:{project_id}")
    }

    /// Subscribe to pipeline events for this project.
    /// Returns a pinned stream that can be polled with `.next()`.
    pub async fn subscribe(
        &self,
    ) -> StoreResult<std::pin::Pin<Box<dyn futures_util::Stream<Item = PipelineEvent> + Send>>>
    {
        use futures_util::StreamExt;

        let mut pubsub = self.client.get_async_pubsub().await?;
        let channel = Self::channel_name(&self.project_id);

        pubsub.subscribe(&channel).await?;

        let stream = pubsub.into_on_message().filter_map(|msg| async move {
            let payload: String = msg.get_payload().ok()?;
            serde_json::from_str(&payload).ok()
        });

        Ok(Box::pin(stream))
    }
}

#[async_trait]
impl SnapshotSink for SnapshotChannel {
    async fn publish(&self, event: &PipelineEvent) -> StoreResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let channel = Self::channel_name(&self.project_id);
        let payload = serde_json::to_string(event)?;

        debug!(channel = %channel, "Publishing pipeline event");
        conn.publish::<_, _, ()>(channel, payload).await?;

        Ok(())
    }
}
