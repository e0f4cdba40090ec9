//! Script document: the root aggregate the pipeline operates on.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::Scene;

/// Unique project identifier, also the persistence key suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScriptMeta {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub genre: String,
    /// Prompt used for the project thumbnail
    pub thumbnail_prompt: String,
    /// Background music mood requested for the final edit
    pub bgm_mood: String,
    /// Stamped by the persistence layer on every save
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Art direction applied across every scene of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GlobalStyle {
    /// Art style name fed into every visual prompt
    pub art_style: String,
    /// Description of a recurring character, kept consistent across scenes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_character: Option<String>,
}

/// Root aggregate: metadata, global style and the ordered scenes.
///
/// Owned exclusively by the orchestrator during a pipeline run; callers only
/// ever see snapshots pushed after each checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScriptDocument {
    pub project_id: ProjectId,
    pub meta: ScriptMeta,
    pub global_style: GlobalStyle,
    pub scenes: Vec<Scene>,
}

impl ScriptDocument {
    /// Positions of `scenes` in ascending `scene_index` order.
    ///
    /// The vector order and the index order normally agree, but processing
    /// order is defined by `scene_index`, so the pipeline always goes through
    /// this.
    pub fn scene_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.scenes.len()).collect();
        order.sort_by_key(|&pos| self.scenes[pos].scene_index);
        order
    }

    /// Stamp the last-modified time. Called by the persistence layer.
    pub fn touch(&mut self) {
        self.meta.updated_at = Some(Utc::now());
    }

    /// Whether every scene has resolved all of its steps.
    pub fn is_complete(&self) -> bool {
        self.scenes.iter().all(|s| s.is_complete())
    }
}
