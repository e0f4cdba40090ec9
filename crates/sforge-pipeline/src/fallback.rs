//! Video-to-grid fallback.
//!
//! When a video-typed scene cannot get a motion artifact, the scene is
//! re-expressed as a static 2x2 panel composition: the narration is split
//! into four narrower cuts and a single composite image is generated with
//! one quadrant per cut. The rewrite is permanent; the scene is image-typed
//! from then on.

use std::sync::Arc;

use tracing::info;

use sforge_gen::{GenError, GenerationBackend};
use sforge_models::{Cut, LayoutPlan, Scene};

use crate::retry::{run_with_retry, RetryPolicy};

/// Placeholder quadrant descriptions for cuts the splitter did not produce.
const QUADRANT_PLACEHOLDERS: [&str; 4] = ["Opening shot", "Development", "Climax", "Conclusion"];

const QUADRANT_LABELS: [&str; 4] = ["top-left", "top-right", "bottom-left", "bottom-right"];

/// Decomposes a failed video scene into a grid composition.
pub struct FallbackDecomposer {
    backend: Arc<dyn GenerationBackend>,
    retry: RetryPolicy,
}

impl FallbackDecomposer {
    pub fn new(backend: Arc<dyn GenerationBackend>, retry: RetryPolicy) -> Self {
        Self { backend, retry }
    }

    /// Attempt the fallback rewrite.
    ///
    /// Returns `Ok(true)` if the scene was rewritten. `Ok(false)` leaves the
    /// scene exactly as it was, with the video step still pending, so a
    /// later run can try again. Quota exhaustion propagates.
    pub async fn run(&self, scene: &mut Scene) -> Result<bool, GenError> {
        let narration = scene.scripts.narration.clone();
        let visual = scene.prompts.visual.clone();

        let cuts = match run_with_retry(&self.retry, "split_narration", || {
            self.backend.split_narration(&narration, &visual)
        })
        .await?
        {
            Some(cuts) if !cuts.is_empty() => cuts,
            _ => {
                info!(
                    scene_index = scene.scene_index,
                    "Narration split produced no cuts, scene left for a later pass"
                );
                return Ok(false);
            }
        };

        let prompt = compose_grid_prompt(&visual, &cuts);
        let image = match run_with_retry(&self.retry, "grid_image", || {
            self.backend.generate_image(&prompt, LayoutPlan::Grid2x2)
        })
        .await?
        {
            Some(image) => image,
            None => return Ok(false),
        };

        scene.apply_grid_fallback(cuts, image);
        info!(
            scene_index = scene.scene_index,
            "Scene rewritten as a 2x2 grid composition"
        );
        Ok(true)
    }
}

/// Build the composite prompt: the original visual prompt plus one labeled
/// description per quadrant, padded with generic placeholders when fewer
/// than four cuts came back.
pub(crate) fn compose_grid_prompt(visual_prompt: &str, cuts: &[Cut]) -> String {
    let mut prompt = format!(
        "A 2x2 grid of four panels telling one continuous moment. Overall scene: {visual_prompt}."
    );

    for (i, label) in QUADRANT_LABELS.iter().enumerate() {
        let detail = cuts
            .get(i)
            .map(|c| c.visual_detail.trim())
            .filter(|d| !d.is_empty())
            .unwrap_or(QUADRANT_PLACEHOLDERS[i]);
        prompt.push_str(&format!(" {label} panel: {detail}."));
    }

    prompt
}
