//! Per-frame diagnostics returned alongside the magnifier output.
//!
//! Everything here is plain data meant for JSON dumps and tooling; the
//! pipeline itself never reads it back.
use crate::roles::CornerRole;
use crate::types::{AnchorId, Extent, Pixel};
use serde::{Deserialize, Serialize};

/// Timing entry describing a single stage of the frame pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace for one frame.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    pub fn stage_ms(&self, label: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.elapsed_ms)
    }
}

/// Bounds search summary.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundsStage {
    pub initial: Extent,
    pub chosen: Extent,
    /// `None` when no shrink ratio fit and the original bounds were kept.
    pub ratio: Option<f64>,
    pub candidates_evaluated: usize,
}

/// A projected corner with its screen role.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerSample {
    pub pixel: Pixel,
    pub world: [f64; 3],
    pub role: CornerRole,
}

/// Everything observed while processing one frame.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameTrace {
    pub timestamp: f64,
    pub anchor_id: Option<AnchorId>,
    /// Projection of the originally tapped point, when in front of the camera.
    pub tap_pixel: Option<Pixel>,
    pub center_pixel: Option<Pixel>,
    pub bounds: Option<BoundsStage>,
    pub corners: Vec<CornerSample>,
    /// Output size after orientation.
    pub output_size: Option<(usize, usize)>,
    /// Display text of the skip reason, if the frame produced no image.
    pub skipped: Option<String>,
    pub timing: TimingBreakdown,
}
