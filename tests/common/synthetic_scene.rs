//! Rendered scenes with known geometry for end-to-end checks.
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
use plane_magnifier::camera::{intrinsics_matrix, look_at, Camera};
use plane_magnifier::image::ImageBufU8;
use plane_magnifier::synthetic::render_planes;
use plane_magnifier::types::{AnchorId, CameraFrame, PlaneAnchor};

pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;
pub const FOCAL: f64 = 200.0;
pub const BACKGROUND: u8 = 90;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn intrinsics() -> Matrix3<f64> {
    intrinsics_matrix(FOCAL, FOCAL, WIDTH as f64 * 0.5, HEIGHT as f64 * 0.5)
}

/// Camera straight above the origin; world +x is image right, +z image down.
pub fn overhead_pose(height: f64) -> Matrix4<f64> {
    look_at(
        Point3::new(0.0, height, 0.0),
        Point3::origin(),
        Vector3::new(0.0, 0.0, -1.0),
    )
    .expect("valid look-at")
}

/// Camera in front of and above the origin, looking down at it.
pub fn oblique_pose() -> Matrix4<f64> {
    look_at(
        Point3::new(0.0, 1.5, 1.2),
        Point3::origin(),
        Vector3::new(0.0, 0.0, -1.0),
    )
    .expect("valid look-at")
}

/// Horizontal plane with identity orientation.
pub fn floor_anchor(id: u64, center: [f64; 3], extent: [f64; 2]) -> PlaneAnchor {
    PlaneAnchor {
        id: AnchorId(id),
        transform: Matrix4::identity(),
        center,
        extent,
    }
}

/// Distinct gray level per plane-local quadrant.
pub fn quadrant_value([x, z]: [f64; 2]) -> u8 {
    match (x >= 0.0, z >= 0.0) {
        (false, false) => 40,
        (true, false) => 100,
        (false, true) => 160,
        (true, true) => 220,
    }
}

/// A rendered frame together with the data describing it.
pub struct Scene {
    pub pose: Matrix4<f64>,
    pub anchors: Vec<PlaneAnchor>,
    pub pixels: ImageBufU8,
}

impl Scene {
    pub fn render<F>(pose: Matrix4<f64>, anchors: Vec<PlaneAnchor>, texture: F) -> Self
    where
        F: Fn(AnchorId, [f64; 2], &mut [u8]) + Sync,
    {
        let camera = Camera::new(pose, intrinsics()).expect("rigid pose");
        let pixels = render_planes(&camera, &anchors, WIDTH, HEIGHT, 1, BACKGROUND, texture);
        Self {
            pose,
            anchors,
            pixels,
        }
    }

    pub fn quadrants(pose: Matrix4<f64>, anchors: Vec<PlaneAnchor>) -> Self {
        Self::render(pose, anchors, |_, p, px| px.fill(quadrant_value(p)))
    }

    pub fn frame(&self, timestamp: f64) -> CameraFrame<'_> {
        CameraFrame {
            timestamp,
            intrinsics: intrinsics(),
            pose: self.pose,
            image: self.pixels.as_view(),
            anchors: &self.anchors,
        }
    }
}
