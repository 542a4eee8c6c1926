//! Parameter types configuring the magnifier stages.
//!
//! Defaults aim at live use on phone-sized frames: a 5% shrink step for the
//! bounds search and a quarter-turn output rotation for portrait display.
use crate::bounds::BoundsParams;
use crate::rectify::RectifyParams;
use serde::{Deserialize, Serialize};

/// Pipeline-wide parameters.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnifierParams {
    /// Shrink search applied when the plane extent leaves the frame.
    pub bounds: BoundsParams,
    /// Warp output size, fill and orientation.
    pub rectify: RectifyParams,
}
