//! Shrink a plane extent until its projection fits inside the captured frame.
//!
//! At close range a tracked plane can be much larger than the camera's field of
//! view, so some extent corners project off-screen. The adjuster evaluates a
//! descending sequence of shrink ratios, each scaling the extent about its
//! original center (same ratio on both axes), and keeps a ratio whose four
//! projected corners are all on-screen. If nothing validates, the original
//! bounds are returned unchanged.
//!
//! Two search policies are available, see [`ShrinkSearch`].
use crate::camera::Camera;
use crate::corners::project_corners;
use crate::types::{Extent, FrameSize, Pixel};
use log::{debug, trace};
use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

/// How the ratio sequence is searched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShrinkSearch {
    /// Stop at the first (largest) ratio that validates.
    FirstValid,
    /// Evaluate every ratio; the last one that validates wins. With a
    /// descending sequence this prefers the most aggressive valid shrink.
    LastValid,
}

/// Parameters for the bounds search.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsParams {
    /// Shrink ratios in the order they are tried, mild to aggressive.
    pub ratios: Vec<f64>,
    pub search: ShrinkSearch,
}

impl BoundsParams {
    /// Ratios `1.0, 1.0 - step, ...` down to (but not below) `step`.
    pub fn with_step(step: f64) -> Self {
        let step = if step.is_finite() && step > 0.0 { step.min(1.0) } else { 0.05 };
        let count = (1.0 / step).round().max(1.0) as usize;
        let ratios = (0..count)
            .map(|i| 1.0 - step * i as f64)
            .filter(|r| *r > 0.0)
            .collect();
        Self {
            ratios,
            search: ShrinkSearch::FirstValid,
        }
    }
}

impl Default for BoundsParams {
    fn default() -> Self {
        Self::with_step(0.05)
    }
}

/// Outcome of a bounds search.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundsAdjustment {
    pub extent: Extent,
    /// Accepted ratio, or `None` when the search fell back to the input bounds.
    pub ratio: Option<f64>,
    pub evaluated: usize,
}

impl BoundsAdjustment {
    pub fn is_fallback(&self) -> bool {
        self.ratio.is_none()
    }
}

/// Valid when every corner is projectable and inside `[0, width] × [0, height]`.
pub fn corners_on_screen(corners: &[Option<Pixel>; 4], frame: FrameSize) -> bool {
    corners
        .iter()
        .all(|c| c.is_some_and(|p| frame.contains(p)))
}

/// Search for the extent to sample this frame.
pub fn adjust(
    camera: &Camera,
    plane_transform: &Matrix4<f64>,
    initial: &Extent,
    y: f64,
    frame: FrameSize,
    params: &BoundsParams,
) -> BoundsAdjustment {
    let center = initial.center();
    let mut accepted: Option<(f64, Extent)> = None;
    let mut evaluated = 0usize;

    for &ratio in &params.ratios {
        if !ratio.is_finite() || ratio <= 0.0 {
            continue;
        }
        evaluated += 1;
        let candidate = initial.shrink_about(center, ratio);
        let corners = project_corners(camera, plane_transform, &candidate, y);
        let valid = corners_on_screen(&corners, frame);
        trace!("bounds: ratio={ratio:.3} valid={valid}");
        if valid {
            accepted = Some((ratio, candidate));
            if params.search == ShrinkSearch::FirstValid {
                break;
            }
        }
    }

    match accepted {
        Some((ratio, extent)) => {
            debug!("bounds: accepted ratio={ratio:.3} after {evaluated} candidates");
            BoundsAdjustment {
                extent,
                ratio: Some(ratio),
                evaluated,
            }
        }
        None => {
            debug!("bounds: no candidate fits the frame, keeping original extent");
            BoundsAdjustment {
                extent: *initial,
                ratio: None,
                evaluated,
            }
        }
    }
}
