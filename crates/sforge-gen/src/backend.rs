//! The collaborator contract the orchestrator depends on.

use async_trait::async_trait;

use sforge_models::{AudioAsset, Cut, ImageAsset, InspectionData, LayoutPlan, VideoAsset, VoiceTone};

use crate::error::GenResult;

/// Remote generation operations, one method per asset kind.
///
/// Every call is a suspension point; implementations are expected to make at
/// most one request in flight per call and to classify provider failures
/// through [`crate::GenError`]. All of these except `video_capability` get
/// wrapped in the pipeline's retry executor.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Synthesize one image for the prompt, composed per the layout.
    async fn generate_image(&self, prompt: &str, layout: LayoutPlan) -> GenResult<ImageAsset>;

    /// Synthesize narration audio in the given voice tone.
    async fn generate_speech(&self, text: &str, tone: VoiceTone) -> GenResult<AudioAsset>;

    /// Inspect a generated image for its actual panel composition.
    async fn inspect_image(&self, image: &ImageAsset) -> GenResult<InspectionData>;

    /// Animate a still image into a motion video.
    ///
    /// `Ok(None)` means the provider produced no video. That is not an
    /// error: the caller falls back to the grid composition instead.
    async fn generate_video(
        &self,
        image: &ImageAsset,
        motion_strength: f32,
        duration_secs: f64,
    ) -> GenResult<Option<VideoAsset>>;

    /// Whether video synthesis is currently available. Probed once per
    /// pipeline run.
    async fn video_capability(&self) -> GenResult<bool>;

    /// Decompose a narration into up to four ordered cuts with matching
    /// visual details. An empty result aborts the fallback.
    async fn split_narration(&self, narration: &str, visual_prompt: &str) -> GenResult<Vec<Cut>>;
}
