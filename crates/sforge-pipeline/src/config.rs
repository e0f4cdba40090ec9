//! Pipeline configuration.

use std::time::Duration;

use crate::retry::RetryPolicy;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Retry behavior for every remote generation call
    pub retry: RetryPolicy,
    /// Fixed delay between scenes, so the remote services are never hammered
    pub scene_pacing: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            scene_pacing: Duration::from_millis(2000),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            retry: RetryPolicy::from_env(),
            scene_pacing: Duration::from_millis(
                std::env::var("SFORGE_SCENE_PACING_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(2000),
            ),
        }
    }
}
