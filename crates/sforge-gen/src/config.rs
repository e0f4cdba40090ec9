//! Generation client configuration.

use std::time::Duration;

use crate::error::{GenError, GenResult};

/// Configuration for the HTTP generation backend.
#[derive(Debug, Clone)]
pub struct GenConfig {
    /// Provider base URL
    pub base_url: String,
    /// Bearer token
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl GenConfig {
    /// Create config from environment variables.
    pub fn from_env() -> GenResult<Self> {
        let base_url = std::env::var("SFORGE_GEN_BASE_URL")
            .map_err(|_| GenError::config_error("SFORGE_GEN_BASE_URL not set"))?;
        let api_key = std::env::var("SFORGE_GEN_API_KEY")
            .map_err(|_| GenError::config_error("SFORGE_GEN_API_KEY not set"))?;

        let timeout_secs: u64 = std::env::var("SFORGE_GEN_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(300);

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
