//! Retry executor with exponential backoff and quota short-circuiting.
//!
//! Remote generation calls fail in three ways that need different handling:
//! transient conditions are retried with doubling delays, quota exhaustion
//! aborts the whole run, and anything else (or running out of retries) is
//! swallowed into a "skip this asset" sentinel so one bad asset never stalls
//! the pipeline.

use std::future::Future;
use std::time::Duration;

use metrics::counter;
use tracing::{debug, warn};

use sforge_gen::{GenError, GenResult};

/// Retry behavior for one wrapped operation.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (not including the initial attempt).
    pub max_retries: u32,
    /// Base delay for exponential backoff (doubles each attempt).
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(4000),
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base delay for exponential backoff.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Create policy from environment variables.
    pub fn from_env() -> Self {
        let max_retries = std::env::var("SFORGE_RETRY_MAX")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3);
        let base_delay_ms = std::env::var("SFORGE_RETRY_BASE_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(4000);

        Self {
            max_retries,
            base_delay: Duration::from_millis(base_delay_ms),
        }
    }
}

/// Execute an async generation call under the retry policy.
///
/// Returns:
/// - `Ok(Some(value))` on success;
/// - `Err(e)` immediately and without delay when the provider reports quota
///   exhaustion, which is fatal for the rest of the run;
/// - `Ok(None)` when the error is not transient or retries are exhausted:
///   the step did not complete, its flag stays false, and a later run may
///   try again.
///
/// The backoff is an explicit loop, bounded by `max_retries`; at most
/// `max_retries + 1` invocations of `op` ever happen.
pub async fn run_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    op: F,
) -> Result<Option<T>, GenError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = GenResult<T>>,
{
    let mut attempt = 0u32;
    let mut delay = policy.base_delay;

    loop {
        match op().await {
            Ok(value) => return Ok(Some(value)),
            Err(e) if e.is_quota_exceeded() => {
                warn!("{} aborted, provider quota exhausted: {}", operation_name, e);
                return Err(e);
            }
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                attempt += 1;
                counter!("sforge_retry_attempts_total").increment(1);
                debug!(
                    "{} attempt {} failed, retrying in {:?}: {}",
                    operation_name, attempt, delay, e
                );
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
            }
            Err(e) => {
                counter!("sforge_steps_skipped_total").increment(1);
                warn!(
                    "{} giving up after {} attempts, leaving step pending: {}",
                    operation_name,
                    attempt + 1,
                    e
                );
                return Ok(None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy() -> RetryPolicy {
        RetryPolicy::new()
    }

    #[tokio::test]
    async fn test_immediate_success_single_invocation() {
        let calls = AtomicU32::new(0);

        let result = run_with_retry(&policy(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, GenError>(42) }
        })
        .await;

        assert_eq!(result.unwrap(), Some(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_doubles_then_succeeds() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result = run_with_retry(&policy(), "test", || {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if call < 2 {
                    Err(GenError::Transient("rate limit".to_string()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), Some(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 4000ms after the first failure, 8000ms after the second
        assert!(started.elapsed() >= Duration::from_millis(12_000));
        assert!(started.elapsed() < Duration::from_millis(13_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_quota_short_circuits_without_delay() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result = run_with_retry(&policy(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<u32, _>(GenError::QuotaExceeded("quota exceeded".to_string())) }
        })
        .await;

        assert!(result.unwrap_err().is_quota_exceeded());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_permanent_error_swallowed_to_sentinel() {
        let calls = AtomicU32::new(0);

        let result = run_with_retry(&policy(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<u32, _>(GenError::Permanent("policy violation".to_string())) }
        })
        .await;

        assert_eq!(result.unwrap(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_exhaustion_swallowed_to_sentinel() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new().with_max_retries(2);

        let result = run_with_retry(&policy, "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<u32, _>(GenError::Transient("server unavailable".to_string())) }
        })
        .await;

        assert_eq!(result.unwrap(), None);
        // Initial attempt plus two retries
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
