//! Shared data model: plane anchors, camera frames, extents and projected corners.
//!
//! All values are per-frame snapshots supplied by the tracking subsystem; the
//! pipeline never keeps them across frames.
use crate::image::ImageU8;
use nalgebra::{Matrix3, Matrix4, Point3};
use serde::{Deserialize, Serialize};

/// Pixel coordinate, origin at the top-left of the captured image, y down.
pub type Pixel = [f64; 2];

/// Identity token of a tracked plane, stable across frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorId(pub u64);

/// Snapshot of a tracked planar surface.
///
/// The plane lies in the local x/z plane; `center` and `extent` are expressed
/// in plane-local units and `transform` maps plane-local to world.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaneAnchor {
    pub id: AnchorId,
    pub transform: Matrix4<f64>,
    pub center: [f64; 3],
    /// Width along local x, depth along local z.
    pub extent: [f64; 2],
}

impl PlaneAnchor {
    /// Axis-aligned plane-local rectangle covered by the anchor.
    pub fn local_extent(&self) -> Extent {
        Extent::centered(
            [self.center[0], self.center[2]],
            self.extent[0],
            self.extent[1],
        )
    }

    /// Plane-local y at which the extent is evaluated.
    pub fn local_y(&self) -> f64 {
        self.center[1]
    }
}

/// Pair of plane-local intervals `[x_min, x_max] × [z_min, z_max]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub x: [f64; 2],
    pub z: [f64; 2],
}

impl Extent {
    pub fn new(x: [f64; 2], z: [f64; 2]) -> Self {
        Self { x, z }
    }

    pub fn centered(center_xz: [f64; 2], width: f64, depth: f64) -> Self {
        let (hw, hd) = (0.5 * width, 0.5 * depth);
        Self {
            x: [center_xz[0] - hw, center_xz[0] + hw],
            z: [center_xz[1] - hd, center_xz[1] + hd],
        }
    }

    pub fn center(&self) -> [f64; 2] {
        [0.5 * (self.x[0] + self.x[1]), 0.5 * (self.z[0] + self.z[1])]
    }

    pub fn width(&self) -> f64 {
        self.x[1] - self.x[0]
    }

    pub fn depth(&self) -> f64 {
        self.z[1] - self.z[0]
    }

    /// Scale every bound's distance from `center` by `ratio`.
    ///
    /// The same ratio applies to both axes, so the aspect ratio is preserved.
    pub fn shrink_about(&self, center: [f64; 2], ratio: f64) -> Self {
        let scale = |v: f64, c: f64| c + (v - c) * ratio;
        Self {
            x: [scale(self.x[0], center[0]), scale(self.x[1], center[0])],
            z: [scale(self.z[0], center[1]), scale(self.z[1], center[1])],
        }
    }
}

/// Captured image dimensions used for on-screen checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: usize,
    pub height: usize,
}

impl FrameSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Inclusive containment in `[0, width] × [0, height]`.
    pub fn contains(&self, p: Pixel) -> bool {
        p[0] >= 0.0 && p[0] <= self.width as f64 && p[1] >= 0.0 && p[1] <= self.height as f64
    }
}

/// A projected extent corner together with the world point it came from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectedCorner {
    pub pixel: Pixel,
    pub world: Point3<f64>,
}

/// Everything the tracking subsystem hands over for one camera frame.
#[derive(Clone, Copy, Debug)]
pub struct CameraFrame<'a> {
    pub timestamp: f64,
    pub intrinsics: Matrix3<f64>,
    /// Camera-local to world.
    pub pose: Matrix4<f64>,
    pub image: ImageU8<'a>,
    pub anchors: &'a [PlaneAnchor],
}

impl<'a> CameraFrame<'a> {
    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.image.w, self.image.h)
    }

    /// Re-locate a tracked plane by identity.
    pub fn anchor(&self, id: AnchorId) -> Option<&'a PlaneAnchor> {
        self.anchors.iter().find(|a| a.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrink_preserves_center_and_aspect() {
        let e = Extent::centered([1.0, -2.0], 4.0, 2.0);
        let s = e.shrink_about(e.center(), 0.5);
        assert_eq!(s.center(), [1.0, -2.0]);
        assert!((s.width() - 2.0).abs() < 1e-12);
        assert!((s.depth() - 1.0).abs() < 1e-12);
        assert!((s.width() / s.depth() - e.width() / e.depth()).abs() < 1e-12);
    }

    #[test]
    fn frame_bounds_are_inclusive() {
        let size = FrameSize::new(10, 5);
        assert!(size.contains([0.0, 0.0]));
        assert!(size.contains([10.0, 5.0]));
        assert!(!size.contains([10.01, 1.0]));
        assert!(!size.contains([1.0, -0.01]));
    }

    #[test]
    fn anchor_extent_uses_center_xz() {
        let anchor = PlaneAnchor {
            id: AnchorId(7),
            transform: Matrix4::identity(),
            center: [0.5, 0.1, -0.5],
            extent: [1.0, 3.0],
        };
        let e = anchor.local_extent();
        assert_eq!(e.x, [0.0, 1.0]);
        assert_eq!(e.z, [-2.0, 1.0]);
        assert_eq!(anchor.local_y(), 0.1);
    }
}
