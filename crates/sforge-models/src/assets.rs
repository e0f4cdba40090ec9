//! Generated-asset handles and filename conventions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Handle to a generated image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ImageAsset {
    /// Where the provider stored the image
    pub url: String,
}

impl ImageAsset {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Handle to a generated narration audio track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AudioAsset {
    /// Where the provider stored the audio
    pub url: String,
    /// Measured duration, when the provider reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
}

impl AudioAsset {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            duration_secs: None,
        }
    }
}

/// Handle to a generated motion video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoAsset {
    /// Where the provider stored the video
    pub url: String,
}

impl VideoAsset {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Per-scene asset slots plus the filenames downstream packaging expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SceneAssets {
    /// Base identifier shared by every file of this scene
    pub base_id: String,
    /// Filename for the visual artifact (image, or video after a successful
    /// video step)
    pub visual_filename: String,
    /// Filename for the narration audio
    pub audio_filename: String,
    /// Filename for the subtitle track
    pub subtitle_filename: String,
    /// Generated image, once produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageAsset>,
    /// Generated narration audio, once produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioAsset>,
    /// Generated motion video, once produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoAsset>,
}

impl SceneAssets {
    /// Create empty asset slots with the standard filename conventions.
    pub fn new(base_id: impl Into<String>) -> Self {
        let base_id = base_id.into();
        Self {
            visual_filename: format!("{base_id}.png"),
            audio_filename: format!("{base_id}.mp3"),
            subtitle_filename: format!("{base_id}.srt"),
            image: None,
            audio: None,
            video: None,
            base_id,
        }
    }

    /// Filename convention for a motion video of this scene.
    pub fn video_filename(&self) -> String {
        format!("{}.mp4", self.base_id)
    }

    /// Switch the visual slot to the video filename convention.
    ///
    /// Called exactly once, when a direct video generation succeeds.
    pub fn use_video_filename(&mut self) {
        self.visual_filename = self.video_filename();
    }
}
