//! Remote generation collaborators for the StoryForge pipeline.
//!
//! The orchestrator only ever sees the [`GenerationBackend`] trait and the
//! structured [`GenError`] taxonomy; the HTTP client maps provider responses
//! onto both so retry policy never has to parse message text.

pub mod backend;
pub mod config;
pub mod error;
pub mod http;

pub use backend::GenerationBackend;
pub use config::GenConfig;
pub use error::{classify_provider_error, GenError, GenResult};
pub use http::HttpGenerationBackend;
