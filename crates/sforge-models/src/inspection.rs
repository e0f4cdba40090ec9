//! Inspection results and fallback decomposition cuts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::LayoutPlan;

/// Result of the automated visual inspection of a generated image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InspectionData {
    /// Layout the inspector actually detected in the image
    pub detected_layout: LayoutPlan,
    /// Number of distinct panels found
    pub panel_count: u32,
    /// Free-text description of the image contents
    pub description: String,
}

impl InspectionData {
    /// Degraded default substituted when inspection keeps failing.
    ///
    /// Inspection failure must not block the pipeline; the scene is marked
    /// inspected with this placeholder instead.
    pub fn degraded() -> Self {
        Self {
            detected_layout: LayoutPlan::Single,
            panel_count: 1,
            description: "Automatic inspection failed; assuming a single full-frame panel."
                .to_string(),
        }
    }

    /// Whether this result came from the degraded default rather than a real
    /// inspection pass.
    pub fn is_degraded(&self) -> bool {
        self.description.starts_with("Automatic inspection failed")
    }
}

/// One narration segment produced by the video-to-grid fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Cut {
    /// Position within the decomposition (1-based)
    pub cut_no: u32,
    /// Narrower narration for this segment
    pub narration: String,
    /// Short visual description used for the matching grid quadrant
    pub visual_detail: String,
}

impl Cut {
    pub fn new(cut_no: u32, narration: impl Into<String>, visual_detail: impl Into<String>) -> Self {
        Self {
            cut_no,
            narration: narration.into(),
            visual_detail: visual_detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_inspection_shape() {
        let data = InspectionData::degraded();
        assert_eq!(data.detected_layout, LayoutPlan::Single);
        assert_eq!(data.panel_count, 1);
        assert!(data.is_degraded());
    }
}
