//! Pipeline error types.

use thiserror::Error;

use sforge_gen::GenError;
use sforge_store::StoreError;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that cross the orchestrator boundary.
///
/// Transient and permanent generation failures never show up here; the retry
/// executor absorbs them into "still pending" steps. What remains is quota
/// exhaustion and persistence failures, both of which abort the run while
/// leaving every prior checkpoint intact.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Generation failed: {0}")]
    Generation(#[from] GenError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl PipelineError {
    /// Check if the run aborted because the provider quota is exhausted.
    ///
    /// The operator should resume later; everything checkpointed so far is
    /// valid.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, PipelineError::Generation(e) if e.is_quota_exceeded())
    }
}
