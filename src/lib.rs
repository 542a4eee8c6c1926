#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod magnifier;
pub mod diagnostics;
pub mod image;
pub mod types;

// Stage modules: usable on their own, the session composes them.
pub mod bounds;
pub mod camera;
pub mod corners;
pub mod homography;
pub mod rectify;
pub mod roles;
pub mod target;

// Tooling.
pub mod config;
pub mod synthetic;

// --- High-level re-exports -------------------------------------------------

// Main entry points: session + per-frame results.
pub use crate::magnifier::{
    FrameOutcome, FrameReport, MagnifierParams, MagnifierSession, RectifiedFrame, SkipReason,
};
pub use crate::types::{AnchorId, CameraFrame, PlaneAnchor};

// Diagnostics returned alongside each frame.
pub use crate::diagnostics::{FrameTrace, TimingBreakdown};

// Standalone helpers that are generally useful.
pub use crate::homography::{apply_homography_points, homography_from_quad};
pub use crate::rectify::{rectify, OutputOrientation, RectifyParams};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use plane_magnifier::prelude::*;
/// use nalgebra::{Matrix3, Matrix4, Point3};
///
/// # fn main() {
/// let (w, h) = (640usize, 480usize);
/// let rgb = vec![0u8; w * h * 3];
/// let anchors = [PlaneAnchor {
///     id: AnchorId(1),
///     transform: Matrix4::identity(),
///     center: [0.0, 0.0, 0.0],
///     extent: [1.0, 1.0],
/// }];
/// let frame = CameraFrame {
///     timestamp: 0.0,
///     intrinsics: Matrix3::new(500.0, 0.0, 320.0, 0.0, 500.0, 240.0, 0.0, 0.0, 1.0),
///     pose: Matrix4::identity(),
///     image: ImageU8::packed(w, h, 3, &rgb).expect("packed"),
///     anchors: &anchors,
/// };
///
/// let mut session = MagnifierSession::new(MagnifierParams::default());
/// session.select_target(AnchorId(1), Point3::origin());
/// match session.process_frame(&frame) {
///     FrameOutcome::Rectified(out) => println!("{}x{}", out.image.w, out.image.h),
///     FrameOutcome::Skipped(reason) => println!("skipped: {reason}"),
/// }
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageBufU8, ImageU8};
    pub use crate::types::{AnchorId, CameraFrame, Pixel, PlaneAnchor};
    pub use crate::{FrameOutcome, MagnifierParams, MagnifierSession, SkipReason};
}
