//! Structured per-scene logging.

use tracing::{info, warn};

use sforge_models::PipelineStep;

/// Scene-scoped logger with consistent formatting for step lifecycle events.
#[derive(Debug, Clone)]
pub struct SceneLogger {
    scene_index: u32,
}

impl SceneLogger {
    pub fn new(scene_index: u32) -> Self {
        Self { scene_index }
    }

    /// Log the start of a step.
    pub fn step_start(&self, step: PipelineStep) {
        info!(
            scene_index = self.scene_index,
            step = %step,
            "Step started"
        );
    }

    /// Log a completed, checkpointed step.
    pub fn step_done(&self, step: PipelineStep) {
        info!(
            scene_index = self.scene_index,
            step = %step,
            "Step completed and checkpointed"
        );
    }

    /// Log a step that did not complete and stays pending.
    pub fn step_pending(&self, step: PipelineStep) {
        warn!(
            scene_index = self.scene_index,
            step = %step,
            "Step did not complete, left pending for a later run"
        );
    }
}
