//! Pipeline event schemas pushed to callers while a run is in flight.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ScriptDocument;

/// Pipeline step identifiers, as surfaced in progress events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    Image,
    Inspection,
    Video,
    Fallback,
    Audio,
}

impl PipelineStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStep::Image => "image",
            PipelineStep::Inspection => "inspection",
            PipelineStep::Video => "video",
            PipelineStep::Fallback => "fallback",
            PipelineStep::Audio => "audio",
        }
    }
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Event envelope published on the snapshot channel.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// Log line with timestamp
    Log {
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// A scene entered processing
    SceneStarted {
        scene_index: u32,
    },

    /// One step of a scene finished and was checkpointed
    StepCompleted {
        scene_index: u32,
        step: PipelineStep,
    },

    /// Full document snapshot after a checkpoint
    DocumentUpdated {
        document: Box<ScriptDocument>,
    },

    /// Fatal error surfaced to the operator
    Error {
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// The run finished (complete, paused or cancelled)
    Done {
        project_id: String,
    },
}

impl PipelineEvent {
    pub fn log(message: impl Into<String>) -> Self {
        Self::Log {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn updated(document: &ScriptDocument) -> Self {
        Self::DocumentUpdated {
            document: Box::new(document.clone()),
        }
    }
}
