//! Generation error taxonomy.
//!
//! Providers report failures three ways that matter to the pipeline:
//! transient conditions worth retrying, quota exhaustion that must abort the
//! whole run, and everything else. Classification happens here, at the
//! collaborator boundary, so the retry policy matches on error kind instead
//! of message text.

use thiserror::Error;

pub type GenResult<T> = Result<T, GenError>;

#[derive(Debug, Error)]
pub enum GenError {
    /// Rate limit, resource exhaustion, server unavailable, "too fast".
    /// Retryable with backoff.
    #[error("Transient provider failure: {0}")]
    Transient(String),

    /// Usage allowance exhausted. Fatal for the remainder of the run.
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Provider rejected the request for a reason retrying will not fix.
    #[error("Permanent provider failure: {0}")]
    Permanent(String),

    /// Provider answered 2xx but the body did not decode.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing or unusable client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Quota-exhaustion markers as providers phrase them. Matched
/// case-insensitively; the Korean forms appear verbatim in responses from
/// the speech and image providers.
const QUOTA_MARKERS: &[&str] = &[
    "quota exceeded",
    "quota has been exhausted",
    "out of quota",
    "할당량 초과",
    "할당량이 소진",
];

/// Transient markers seen in provider bodies that arrive with a 4xx status.
const TRANSIENT_MARKERS: &[&str] = &[
    "rate limit",
    "resource_exhausted",
    "resource exhausted",
    "too fast",
    "server unavailable",
];

impl GenError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Check if error is worth retrying with backoff.
    ///
    /// Transport timeouts and connection failures count; a well-formed
    /// rejection does not.
    pub fn is_transient(&self) -> bool {
        match self {
            GenError::Transient(_) => true,
            GenError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Check if error is a quota exhaustion signal (never retried, aborts
    /// the run).
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, GenError::QuotaExceeded(_))
    }
}

/// Map a non-2xx provider response onto the taxonomy.
///
/// Quota markers win over the status code: some providers report quota
/// exhaustion under 429, which would otherwise read as retryable.
pub fn classify_provider_error(status: u16, body: &str) -> GenError {
    let lower = body.to_lowercase();
    let detail = if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {}", body.trim())
    };

    if QUOTA_MARKERS.iter().any(|m| lower.contains(m)) {
        return GenError::QuotaExceeded(detail);
    }

    match status {
        429 | 500 | 502 | 503 | 504 => GenError::Transient(detail),
        _ if TRANSIENT_MARKERS.iter().any(|m| lower.contains(m)) => GenError::Transient(detail),
        _ => GenError::Permanent(detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_marker_wins_over_retryable_status() {
        let err = classify_provider_error(429, "Quota exceeded for model image-gen");
        assert!(err.is_quota_exceeded());
        assert!(!err.is_transient());
    }

    #[test]
    fn test_korean_quota_marker() {
        let err = classify_provider_error(403, "요청이 거부되었습니다: 할당량 초과");
        assert!(err.is_quota_exceeded());
    }

    #[test]
    fn test_rate_limit_is_transient() {
        assert!(classify_provider_error(429, "slow down").is_transient());
        assert!(classify_provider_error(503, "").is_transient());
        assert!(classify_provider_error(400, "you are sending requests too fast").is_transient());
    }

    #[test]
    fn test_plain_rejection_is_permanent() {
        let err = classify_provider_error(400, "prompt violates content policy");
        assert!(!err.is_transient());
        assert!(!err.is_quota_exceeded());
        assert!(matches!(err, GenError::Permanent(_)));
    }
}
