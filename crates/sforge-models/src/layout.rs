//! Visual composition layouts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Planned visual composition for a scene's image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPlan {
    /// One full-frame panel
    #[default]
    Single,
    /// Two panels side by side
    VerticalSplit,
    /// Two panels stacked
    HorizontalSplit,
    /// One wide panel on top, two below
    TopSplitTriple,
    /// Two panels on top, one wide below
    BottomSplitTriple,
    /// Four equal quadrants
    #[serde(rename = "grid_2x2")]
    Grid2x2,
}

impl LayoutPlan {
    /// All available layouts.
    pub const ALL: &'static [LayoutPlan] = &[
        LayoutPlan::Single,
        LayoutPlan::VerticalSplit,
        LayoutPlan::HorizontalSplit,
        LayoutPlan::TopSplitTriple,
        LayoutPlan::BottomSplitTriple,
        LayoutPlan::Grid2x2,
    ];

    /// Number of panels this layout is composed of.
    pub fn panel_count(&self) -> u32 {
        match self {
            LayoutPlan::Single => 1,
            LayoutPlan::VerticalSplit | LayoutPlan::HorizontalSplit => 2,
            LayoutPlan::TopSplitTriple | LayoutPlan::BottomSplitTriple => 3,
            LayoutPlan::Grid2x2 => 4,
        }
    }

    /// Returns the layout name as used in prompts and filenames.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutPlan::Single => "single",
            LayoutPlan::VerticalSplit => "vertical_split",
            LayoutPlan::HorizontalSplit => "horizontal_split",
            LayoutPlan::TopSplitTriple => "top_split_triple",
            LayoutPlan::BottomSplitTriple => "bottom_split_triple",
            LayoutPlan::Grid2x2 => "grid_2x2",
        }
    }
}

impl fmt::Display for LayoutPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown layout name.
#[derive(Debug, Error)]
#[error("unknown layout: {0}")]
pub struct ParseLayoutError(pub String);

impl FromStr for LayoutPlan {
    type Err = ParseLayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(LayoutPlan::Single),
            "vertical_split" => Ok(LayoutPlan::VerticalSplit),
            "horizontal_split" => Ok(LayoutPlan::HorizontalSplit),
            "top_split_triple" => Ok(LayoutPlan::TopSplitTriple),
            "bottom_split_triple" => Ok(LayoutPlan::BottomSplitTriple),
            "grid_2x2" => Ok(LayoutPlan::Grid2x2),
            other => Err(ParseLayoutError(other.to_string())),
        }
    }
}
