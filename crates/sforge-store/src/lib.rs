//! Persistence for the StoryForge pipeline.
//!
//! The pipeline checkpoints the whole script document after every successful
//! step. Storage is a key-value store with a single fixed key per project;
//! saves stamp the document's last-modified time. Live progress goes out on
//! a separate pub/sub channel so callers can follow a run without polling.

pub mod error;
pub mod snapshot;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use snapshot::{SnapshotChannel, SnapshotSink};
pub use store::{MemoryScriptStore, RedisScriptStore, StateStore};
