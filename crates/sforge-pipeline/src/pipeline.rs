//! The asset-generation orchestrator.
//!
//! Scenes are visited in ascending index order; steps within a scene always
//! follow image -> inspection -> video-or-fallback -> audio. Every
//! successful step is checkpointed to the store and pushed to the snapshot
//! sink before the loop moves on, so a crash between steps never loses more
//! than the step that was in flight.

use std::sync::Arc;

use tracing::{info, warn};

use sforge_gen::GenerationBackend;
use sforge_models::{
    GlobalStyle, InspectionData, PipelineEvent, PipelineStep, Scene, ScriptDocument,
};
use sforge_store::{SnapshotSink, StateStore};

use crate::cancel::CancelToken;
use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::fallback::FallbackDecomposer;
use crate::logging::SceneLogger;
use crate::retry::run_with_retry;

/// Outcome of one pipeline run.
///
/// A run that stopped early (cancelled, or with steps still pending) is not
/// an error; the document is a valid resting state and a later run picks up
/// where this one left off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub scenes_visited: usize,
    pub steps_completed: u32,
    pub fallbacks_applied: u32,
    pub cancelled: bool,
}

/// Walks a script document and fills in missing generated assets.
pub struct Pipeline {
    backend: Arc<dyn GenerationBackend>,
    store: Arc<dyn StateStore>,
    sink: Arc<dyn SnapshotSink>,
    config: PipelineConfig,
    fallback: FallbackDecomposer,
}

impl Pipeline {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        store: Arc<dyn StateStore>,
        sink: Arc<dyn SnapshotSink>,
        config: PipelineConfig,
    ) -> Self {
        let fallback = FallbackDecomposer::new(Arc::clone(&backend), config.retry.clone());
        Self {
            backend,
            store,
            sink,
            config,
            fallback,
        }
    }

    /// Process every scene of the document, strictly sequentially.
    ///
    /// Only quota exhaustion and store failures come back as errors; both
    /// abort the run while leaving every prior checkpoint intact and
    /// resumable.
    pub async fn run(
        &self,
        doc: &mut ScriptDocument,
        cancel: &CancelToken,
    ) -> PipelineResult<RunSummary> {
        let mut summary = RunSummary::default();
        if cancel.is_cancelled() {
            summary.cancelled = true;
            return Ok(summary);
        }

        // One probe per run: if video synthesis is globally down, every
        // eligible video scene goes straight to the fallback instead of
        // wasting a failing call each.
        let video_available = match self.backend.video_capability().await {
            Ok(available) => available,
            Err(e) => {
                warn!("Video capability probe failed, treating as unavailable: {}", e);
                false
            }
        };

        info!(
            project_id = %doc.project_id,
            scenes = doc.scenes.len(),
            video_available,
            "Pipeline run starting"
        );
        self.sink
            .publish(&PipelineEvent::log(format!(
                "Generating assets for {} scenes...",
                doc.scenes.len()
            )))
            .await
            .ok();

        let result = self
            .process_scenes(doc, cancel, video_available, &mut summary)
            .await;

        match result {
            Ok(()) => {
                info!(
                    scenes_visited = summary.scenes_visited,
                    steps_completed = summary.steps_completed,
                    fallbacks_applied = summary.fallbacks_applied,
                    cancelled = summary.cancelled,
                    "Pipeline run finished"
                );
                self.sink
                    .publish(&PipelineEvent::Done {
                        project_id: doc.project_id.to_string(),
                    })
                    .await
                    .ok();
                Ok(summary)
            }
            Err(e) => {
                self.sink
                    .publish(&PipelineEvent::error(e.to_string()))
                    .await
                    .ok();
                Err(e)
            }
        }
    }

    async fn process_scenes(
        &self,
        doc: &mut ScriptDocument,
        cancel: &CancelToken,
        video_available: bool,
        summary: &mut RunSummary,
    ) -> PipelineResult<()> {
        let order = doc.scene_order();
        let total = order.len();

        for (visited, pos) in order.into_iter().enumerate() {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            let scene_index = doc.scenes[pos].scene_index;
            let logger = SceneLogger::new(scene_index);
            summary.scenes_visited += 1;
            self.sink
                .publish(&PipelineEvent::SceneStarted { scene_index })
                .await
                .ok();

            if doc.scenes[pos].needs_image() {
                logger.step_start(PipelineStep::Image);
                if self.image_step(doc, pos).await? {
                    summary.steps_completed += 1;
                    self.checkpoint(doc, scene_index, PipelineStep::Image).await?;
                    logger.step_done(PipelineStep::Image);
                } else {
                    logger.step_pending(PipelineStep::Image);
                }
            }

            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            if doc.scenes[pos].needs_inspection() {
                logger.step_start(PipelineStep::Inspection);
                // Inspection always resolves: a failed inspection degrades
                // to a default result rather than blocking the scene.
                self.inspection_step(doc, pos).await?;
                summary.steps_completed += 1;
                self.checkpoint(doc, scene_index, PipelineStep::Inspection)
                    .await?;
                logger.step_done(PipelineStep::Inspection);
            }

            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            if doc.scenes[pos].needs_video() {
                logger.step_start(PipelineStep::Video);
                match self.video_step(doc, pos, video_available).await? {
                    Some(step) => {
                        summary.steps_completed += 1;
                        if step == PipelineStep::Fallback {
                            summary.fallbacks_applied += 1;
                        }
                        self.checkpoint(doc, scene_index, step).await?;
                        logger.step_done(step);
                    }
                    None => logger.step_pending(PipelineStep::Video),
                }
            }

            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            if doc.scenes[pos].needs_audio() {
                logger.step_start(PipelineStep::Audio);
                if self.audio_step(doc, pos).await? {
                    summary.steps_completed += 1;
                    self.checkpoint(doc, scene_index, PipelineStep::Audio).await?;
                    logger.step_done(PipelineStep::Audio);
                } else {
                    logger.step_pending(PipelineStep::Audio);
                }
            }

            // Pace the remote services between scenes.
            if !cancel.is_cancelled() && visited + 1 < total {
                tokio::time::sleep(self.config.scene_pacing).await;
            }
        }

        Ok(())
    }

    async fn image_step(&self, doc: &mut ScriptDocument, pos: usize) -> PipelineResult<bool> {
        let prompt = compose_image_prompt(&doc.global_style, &doc.scenes[pos]);
        let layout = doc.scenes[pos].planned_layout;

        let result = run_with_retry(&self.config.retry, "generate_image", || {
            self.backend.generate_image(&prompt, layout)
        })
        .await?;

        match result {
            Some(image) => {
                let scene = &mut doc.scenes[pos];
                scene.assets.image = Some(image);
                scene.progress.image_generated = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn inspection_step(&self, doc: &mut ScriptDocument, pos: usize) -> PipelineResult<()> {
        let image = doc.scenes[pos].assets.image.clone();

        let inspection = match image {
            Some(image) => run_with_retry(&self.config.retry, "inspect_image", || {
                self.backend.inspect_image(&image)
            })
            .await?
            .unwrap_or_else(InspectionData::degraded),
            // Flag set without a handle can only come from a hand-seeded
            // document; treat it like a failed inspection.
            None => InspectionData::degraded(),
        };

        let scene = &mut doc.scenes[pos];
        scene.inspection = Some(inspection);
        scene.progress.image_inspected = true;
        Ok(())
    }

    /// Direct video generation when the capability is up, otherwise (or on
    /// any miss) the grid fallback. Returns which step completed, if any.
    async fn video_step(
        &self,
        doc: &mut ScriptDocument,
        pos: usize,
        video_available: bool,
    ) -> PipelineResult<Option<PipelineStep>> {
        if video_available {
            let scene = &doc.scenes[pos];
            if let Some(image) = scene.assets.image.clone() {
                let motion_strength = scene.prompts.motion_strength;
                let duration = scene.duration_prediction;

                let result = run_with_retry(&self.config.retry, "generate_video", || {
                    self.backend.generate_video(&image, motion_strength, duration)
                })
                .await?;

                if let Some(Some(video)) = result {
                    doc.scenes[pos].attach_video(video);
                    return Ok(Some(PipelineStep::Video));
                }
            }
        }

        if self.fallback.run(&mut doc.scenes[pos]).await? {
            Ok(Some(PipelineStep::Fallback))
        } else {
            Ok(None)
        }
    }

    async fn audio_step(&self, doc: &mut ScriptDocument, pos: usize) -> PipelineResult<bool> {
        let text = doc.scenes[pos].audio_source_text().to_string();
        let tone = doc.scenes[pos].scripts.tone;

        let result = run_with_retry(&self.config.retry, "generate_speech", || {
            self.backend.generate_speech(&text, tone)
        })
        .await?;

        match result {
            Some(audio) => {
                let scene = &mut doc.scenes[pos];
                scene.assets.audio = Some(audio);
                scene.progress.audio_generated = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Persist the document, then push the snapshot. The save is awaited
    /// before the loop proceeds; snapshot publishing is best-effort.
    async fn checkpoint(
        &self,
        doc: &mut ScriptDocument,
        scene_index: u32,
        step: PipelineStep,
    ) -> PipelineResult<()> {
        *doc = self.store.save(doc).await?;
        self.sink
            .publish(&PipelineEvent::StepCompleted { scene_index, step })
            .await
            .ok();
        self.sink.publish(&PipelineEvent::updated(doc)).await.ok();
        Ok(())
    }
}

/// Image prompt: the scene's visual prompt plus the document-wide art
/// direction and recurring character, kept consistent across scenes.
fn compose_image_prompt(style: &GlobalStyle, scene: &Scene) -> String {
    let mut prompt = format!("{}, {} style", scene.prompts.visual, style.art_style);
    if let Some(character) = &style.recurring_character {
        prompt.push_str(&format!(", featuring {character}"));
    }
    prompt
}
