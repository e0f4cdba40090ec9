//! StoryForge asset-generation pipeline.
//!
//! Walks a script document scene by scene, fills in missing generated assets
//! (image, inspection, video-or-grid-fallback, audio), checkpoints the
//! document after every successful step, and stops cleanly on cancellation
//! or quota exhaustion. Strictly sequential: one scene at a time, one remote
//! call in flight at a time.

pub mod cancel;
pub mod config;
pub mod error;
pub mod fallback;
pub mod logging;
pub mod pipeline;
pub mod retry;

pub use cancel::CancelToken;
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use fallback::FallbackDecomposer;
pub use pipeline::{Pipeline, RunSummary};
pub use retry::{run_with_retry, RetryPolicy};

#[cfg(test)]
pub(crate) mod testing;
