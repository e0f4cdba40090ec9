//! Shared data models for the StoryForge backend.
//!
//! This crate provides Serde-serializable types for:
//! - Script documents and their metadata
//! - Scenes, progress flags and generated-asset handles
//! - Visual layout plans and voice tones
//! - Fallback decomposition cuts and inspection results
//! - Pipeline event schemas pushed to callers

pub mod assets;
pub mod event;
pub mod inspection;
pub mod layout;
pub mod scene;
pub mod script;

// Re-export common types
pub use assets::{AudioAsset, ImageAsset, SceneAssets, VideoAsset};
pub use event::{PipelineEvent, PipelineStep};
pub use inspection::{Cut, InspectionData};
pub use layout::{LayoutPlan, ParseLayoutError};
pub use scene::{ProgressStatus, Scene, SceneForm, ScenePrompts, SceneScripts, SceneType, VoiceTone};
pub use script::{GlobalStyle, ProjectId, ScriptDocument, ScriptMeta};
