use crate::diagnostics::FrameTrace;
use crate::image::ImageBufU8;
use crate::rectify::RectifyError;
use crate::roles::CornerRole;
use crate::types::{AnchorId, Extent, ProjectedCorner};
use nalgebra::Matrix3;

/// Why a frame produced no image. None of these are fatal: the caller keeps
/// showing the previous output and waits for the next frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("no magnification target selected")]
    Idle,
    #[error("target plane {0:?} is not tracked in this frame")]
    PlaneNotFound(AnchorId),
    #[error("camera pose is not invertible")]
    NonInvertiblePose,
    #[error("a sampled corner is behind the camera")]
    CornerNotProjectable,
    #[error(transparent)]
    Rectify(#[from] RectifyError),
}

/// A successfully magnified frame.
#[derive(Clone, Debug)]
pub struct RectifiedFrame {
    pub image: ImageBufU8,
    /// Sampled corners in enumeration order.
    pub corners: [ProjectedCorner; 4],
    /// Role of each entry of `corners`.
    pub roles: [CornerRole; 4],
    /// Plane-local extent that was sampled.
    pub extent: Extent,
    /// Accepted shrink ratio, `None` when the bounds search fell back.
    pub shrink_ratio: Option<f64>,
    /// Upright output pixel to captured pixel.
    pub src_from_out: Matrix3<f64>,
}

#[derive(Clone, Debug)]
pub enum FrameOutcome {
    Rectified(RectifiedFrame),
    Skipped(SkipReason),
}

impl FrameOutcome {
    pub fn rectified(&self) -> Option<&RectifiedFrame> {
        match self {
            FrameOutcome::Rectified(frame) => Some(frame),
            FrameOutcome::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            FrameOutcome::Rectified(_) => None,
            FrameOutcome::Skipped(reason) => Some(*reason),
        }
    }

    /// The image to display, if this frame produced one.
    pub fn into_image(self) -> Option<ImageBufU8> {
        match self {
            FrameOutcome::Rectified(frame) => Some(frame.image),
            FrameOutcome::Skipped(_) => None,
        }
    }
}

impl From<Result<RectifiedFrame, SkipReason>> for FrameOutcome {
    fn from(result: Result<RectifiedFrame, SkipReason>) -> Self {
        match result {
            Ok(frame) => FrameOutcome::Rectified(frame),
            Err(reason) => FrameOutcome::Skipped(reason),
        }
    }
}

/// Outcome plus the diagnostics gathered while producing it.
#[derive(Clone, Debug)]
pub struct FrameReport {
    pub outcome: FrameOutcome,
    pub trace: FrameTrace,
}
