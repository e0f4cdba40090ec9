//! Scene model: content fields, progress flags and the per-scene state rules.
//!
//! A scene is created fully formed before it enters the pipeline; only the
//! orchestrator mutates it afterwards, one field group at a time. The
//! `needs_*` eligibility rules below are what make a resumed run idempotent:
//! a step whose flag is already set is never run again.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Cut, ImageAsset, InspectionData, LayoutPlan, SceneAssets, VideoAsset};

/// Effective scene type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SceneType {
    /// Motion video wanted for this scene
    Video,
    /// Still image only
    Image,
}

impl SceneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneType::Video => "video",
            SceneType::Image => "image",
        }
    }
}

impl fmt::Display for SceneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Narration voice tone passed to speech synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum VoiceTone {
    Excited,
    #[default]
    Serious,
    Calm,
    Whisper,
}

impl VoiceTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceTone::Excited => "excited",
            VoiceTone::Serious => "serious",
            VoiceTone::Calm => "calm",
            VoiceTone::Whisper => "whisper",
        }
    }
}

impl fmt::Display for VoiceTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Narration text fields for a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SceneScripts {
    /// Narration as written
    pub narration: String,
    /// Pronunciation-adjusted variant preferred for speech synthesis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_text: Option<String>,
    /// Subtitle lines shown during the scene
    #[serde(default)]
    pub subtitles: Vec<String>,
    /// Voice tone for narration audio
    #[serde(default)]
    pub tone: VoiceTone,
}

/// Visual generation hints for a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScenePrompts {
    /// Prompt text for image synthesis
    pub visual: String,
    /// Motion strength hint for video synthesis (0.0..=1.0)
    #[serde(default)]
    pub motion_strength: f32,
}

/// Independent completion flags: the scene's state record.
///
/// Flags only ever go from `false` to `true`; there is no undo. The single
/// exception in the whole model is the fallback rewrite, which leaves
/// `video_generated` false while retiring the video step through the form
/// transition instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ProgressStatus {
    #[serde(default)]
    pub script_done: bool,
    #[serde(default)]
    pub prompt_done: bool,
    #[serde(default)]
    pub image_generated: bool,
    #[serde(default)]
    pub image_inspected: bool,
    #[serde(default)]
    pub audio_generated: bool,
    #[serde(default)]
    pub video_generated: bool,
}

/// Scene shape discriminant.
///
/// `Plain` is every scene as authored. `Decomposed` only exists as the result
/// of the video-to-grid fallback: the narration has been split into cuts and
/// the scene is permanently image-typed. The transition is one-way and has a
/// single writer, [`Scene::apply_grid_fallback`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum SceneForm {
    Plain {
        scene_type: SceneType,
    },
    Decomposed {
        /// Ordered narration segments, one per grid quadrant
        cuts: Vec<Cut>,
        /// The original narration the cuts were derived from
        narration_full: String,
    },
}

/// One unit of content in a script document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Scene {
    /// Unique, stable identity; defines processing order
    pub scene_index: u32,
    #[serde(flatten)]
    pub form: SceneForm,
    /// Estimated seconds of screen time
    pub duration_prediction: f64,
    pub scripts: SceneScripts,
    pub prompts: ScenePrompts,
    pub planned_layout: LayoutPlan,
    pub assets: SceneAssets,
    #[serde(default)]
    pub progress: ProgressStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspection: Option<InspectionData>,
}

impl Scene {
    /// Effective scene type. Decomposed scenes are always image-typed.
    pub fn scene_type(&self) -> SceneType {
        match &self.form {
            SceneForm::Plain { scene_type } => *scene_type,
            SceneForm::Decomposed { .. } => SceneType::Image,
        }
    }

    /// Whether the video-to-grid fallback has rewritten this scene.
    pub fn is_decomposed(&self) -> bool {
        matches!(self.form, SceneForm::Decomposed { .. })
    }

    /// Fallback cuts, if this scene has been decomposed.
    pub fn cuts(&self) -> Option<&[Cut]> {
        match &self.form {
            SceneForm::Plain { .. } => None,
            SceneForm::Decomposed { cuts, .. } => Some(cuts),
        }
    }

    /// Original narration preserved by the fallback, if any.
    pub fn narration_full(&self) -> Option<&str> {
        match &self.form {
            SceneForm::Plain { .. } => None,
            SceneForm::Decomposed { narration_full, .. } => Some(narration_full),
        }
    }

    /// Image step eligible?
    pub fn needs_image(&self) -> bool {
        !self.progress.image_generated
    }

    /// Inspection step eligible? Requires a generated image first.
    pub fn needs_inspection(&self) -> bool {
        self.progress.image_generated && !self.progress.image_inspected
    }

    /// Video-or-fallback step eligible?
    ///
    /// Only video-typed scenes with a generated image qualify; a decomposed
    /// scene is image-typed and therefore never eligible again.
    pub fn needs_video(&self) -> bool {
        self.scene_type() == SceneType::Video
            && self.progress.image_generated
            && !self.progress.video_generated
    }

    /// Audio step eligible?
    pub fn needs_audio(&self) -> bool {
        !self.progress.audio_generated
    }

    /// Whether every step relevant to this scene's type has resolved.
    pub fn is_complete(&self) -> bool {
        self.progress.image_generated
            && self.progress.image_inspected
            && self.progress.audio_generated
            && !self.needs_video()
    }

    /// Text to feed speech synthesis, in priority order: the TTS-optimized
    /// variant, the preserved full narration (after fallback), the narration.
    pub fn audio_source_text(&self) -> &str {
        if let Some(tts) = &self.scripts.tts_text {
            return tts;
        }
        if let Some(full) = self.narration_full() {
            return full;
        }
        &self.scripts.narration
    }

    /// Record a successful direct video generation.
    pub fn attach_video(&mut self, video: VideoAsset) {
        self.assets.video = Some(video);
        self.assets.use_video_filename();
        self.progress.video_generated = true;
    }

    /// Rewrite this scene as a static 2x2 grid composition.
    ///
    /// This is the only writer of `SceneForm::Decomposed`. The original
    /// narration is preserved in the form, the grid image replaces the visual
    /// asset, and `video_generated` stays false: a populated decomposition
    /// plus an image-typed scene IS the completed representation of what was
    /// originally a video scene.
    pub fn apply_grid_fallback(&mut self, cuts: Vec<Cut>, image: ImageAsset) {
        let narration_full = self.scripts.narration.clone();
        self.form = SceneForm::Decomposed {
            cuts,
            narration_full,
        };
        self.planned_layout = LayoutPlan::Grid2x2;
        self.assets.image = Some(image);
        self.progress.image_generated = true;
    }
}
