//! Pinhole camera model for tracked frames.
//!
//! Poses come from the tracking subsystem in its own camera convention: x
//! right, y up, and the optical axis along -z. The pinhole model expects y
//! down and z forward, so camera-local points go through
//! [`tracking_to_pinhole`] before the intrinsics are applied. Getting this
//! flip wrong does not fail, it mirrors the output; keep it in one place.
use crate::types::Pixel;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// Points closer than this to the image plane (in pinhole depth) are rejected.
const MIN_DEPTH: f64 = 1e-9;

/// Convert a camera-local vector from the tracking convention to the pinhole one.
///
/// Negates y and z. The conversion is its own inverse.
#[inline]
pub fn tracking_to_pinhole(v: Vector3<f64>) -> Vector3<f64> {
    Vector3::new(v.x, -v.y, -v.z)
}

/// Inverse of [`tracking_to_pinhole`].
#[inline]
pub fn pinhole_to_tracking(v: Vector3<f64>) -> Vector3<f64> {
    tracking_to_pinhole(v)
}

/// Camera pose and intrinsics for one frame, with the world-to-camera
/// transform cached so repeated projections do not re-invert the pose.
#[derive(Clone, Debug)]
pub struct Camera {
    intrinsics: Matrix3<f64>,
    pose: Matrix4<f64>,
    world_to_camera: Matrix4<f64>,
}

impl Camera {
    /// Returns `None` when the pose is not invertible.
    pub fn new(pose: Matrix4<f64>, intrinsics: Matrix3<f64>) -> Option<Self> {
        let world_to_camera = pose.try_inverse()?;
        Some(Self {
            intrinsics,
            pose,
            world_to_camera,
        })
    }

    pub fn intrinsics(&self) -> &Matrix3<f64> {
        &self.intrinsics
    }

    pub fn pose(&self) -> &Matrix4<f64> {
        &self.pose
    }

    /// Camera center in world coordinates.
    pub fn position(&self) -> Point3<f64> {
        Point3::new(self.pose[(0, 3)], self.pose[(1, 3)], self.pose[(2, 3)])
    }

    /// World point expressed in camera-local space (tracking convention).
    pub fn to_camera(&self, point: &Point3<f64>) -> Point3<f64> {
        self.world_to_camera.transform_point(point)
    }

    /// Project a world point to pixel coordinates.
    ///
    /// Returns `None` for points on or behind the image plane, where the
    /// homogeneous divide is meaningless. Callers treat that as off-screen.
    pub fn project(&self, point: &Point3<f64>) -> Option<Pixel> {
        let local = self.to_camera(point);
        let h = self.intrinsics * tracking_to_pinhole(local.coords);
        let w = h.z;
        if !w.is_finite() || w <= MIN_DEPTH {
            return None;
        }
        let (u, v) = (h.x / w, h.y / w);
        (u.is_finite() && v.is_finite()).then_some([u, v])
    }

    /// World-space viewing ray through a pixel: origin and unit direction.
    pub fn pixel_ray(&self, pixel: Pixel) -> Option<(Point3<f64>, Vector3<f64>)> {
        let k_inv = self.intrinsics.try_inverse()?;
        let dir_pinhole = k_inv * Vector3::new(pixel[0], pixel[1], 1.0);
        let dir_local = pinhole_to_tracking(dir_pinhole);
        let rotation = self.pose.fixed_view::<3, 3>(0, 0);
        let dir_world = rotation * dir_local;
        let norm = dir_world.norm();
        if !norm.is_finite() || norm <= f64::EPSILON {
            return None;
        }
        Some((self.position(), dir_world / norm))
    }
}

/// Project `point` with a one-off camera built from `pose` and `intrinsics`.
pub fn project(
    point: &Point3<f64>,
    pose: &Matrix4<f64>,
    intrinsics: &Matrix3<f64>,
) -> Option<Pixel> {
    Camera::new(*pose, *intrinsics)?.project(point)
}

/// Build a camera pose (camera-local to world) looking from `eye` at `target`.
///
/// The camera's -z axis points at the target and its +y axis is the part of
/// `up` orthogonal to the viewing direction. Returns `None` when `up` is
/// parallel to the viewing direction or `eye == target`.
pub fn look_at(eye: Point3<f64>, target: Point3<f64>, up: Vector3<f64>) -> Option<Matrix4<f64>> {
    let z_axis = (eye - target).try_normalize(f64::EPSILON)?;
    let x_axis = up.cross(&z_axis).try_normalize(f64::EPSILON)?;
    let y_axis = z_axis.cross(&x_axis);
    let mut pose = Matrix4::identity();
    pose.fixed_view_mut::<3, 1>(0, 0).copy_from(&x_axis);
    pose.fixed_view_mut::<3, 1>(0, 1).copy_from(&y_axis);
    pose.fixed_view_mut::<3, 1>(0, 2).copy_from(&z_axis);
    pose.fixed_view_mut::<3, 1>(0, 3).copy_from(&eye.coords);
    Some(pose)
}

/// Intrinsics matrix from focal lengths and principal point.
pub fn intrinsics_matrix(fx: f64, fy: f64, cx: f64, cy: f64) -> Matrix3<f64> {
    Matrix3::new(fx, 0.0, cx, 0.0, fy, cy, 0.0, 0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overhead_camera(height: f64) -> Camera {
        let pose = look_at(
            Point3::new(0.0, height, 0.0),
            Point3::origin(),
            Vector3::new(0.0, 0.0, -1.0),
        )
        .expect("valid look-at");
        Camera::new(pose, intrinsics_matrix(1000.0, 1000.0, 960.0, 540.0)).expect("rigid pose")
    }

    #[test]
    fn convention_flip_negates_y_and_z() {
        let v = tracking_to_pinhole(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(v, Vector3::new(1.0, -2.0, -3.0));
        assert_eq!(pinhole_to_tracking(v), Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn point_on_optical_axis_hits_principal_point() {
        let cam = Camera::new(Matrix4::identity(), intrinsics_matrix(500.0, 500.0, 320.0, 240.0))
            .expect("identity pose");
        let px = cam.project(&Point3::new(0.0, 0.0, -3.0)).expect("in front");
        assert!((px[0] - 320.0).abs() < 1e-9 && (px[1] - 240.0).abs() < 1e-9);
    }

    #[test]
    fn tracking_up_maps_to_smaller_pixel_row() {
        let cam = Camera::new(Matrix4::identity(), intrinsics_matrix(500.0, 500.0, 320.0, 240.0))
            .expect("identity pose");
        let up = cam.project(&Point3::new(0.0, 1.0, -2.0)).expect("in front");
        let right = cam.project(&Point3::new(1.0, 0.0, -2.0)).expect("in front");
        assert!(up[1] < 240.0, "camera +y should appear above the centre");
        assert!(right[0] > 320.0, "camera +x should appear right of the centre");
    }

    #[test]
    fn points_behind_or_on_camera_plane_are_invalid() {
        let cam = Camera::new(Matrix4::identity(), intrinsics_matrix(500.0, 500.0, 320.0, 240.0))
            .expect("identity pose");
        assert!(cam.project(&Point3::new(0.1, 0.2, 2.0)).is_none());
        assert!(cam.project(&Point3::new(0.5, 0.5, 0.0)).is_none());
        assert!(cam.project(&Point3::new(0.0, 0.0, -1e-12)).is_none());
    }

    #[test]
    fn overhead_view_maps_plane_axes_to_image_axes() {
        let cam = overhead_camera(2.0);
        let px = cam.project(&Point3::new(0.5, 0.0, 0.5)).expect("in front");
        assert!((px[0] - 1210.0).abs() < 1e-9);
        assert!((px[1] - 790.0).abs() < 1e-9);
    }

    #[test]
    fn free_function_matches_cached_camera() {
        let cam = overhead_camera(1.5);
        let p = Point3::new(-0.2, 0.0, 0.3);
        assert_eq!(
            project(&p, cam.pose(), cam.intrinsics()),
            cam.project(&p)
        );
    }

    #[test]
    fn singular_pose_is_rejected() {
        assert!(Camera::new(Matrix4::zeros(), Matrix3::identity()).is_none());
    }

    #[test]
    fn pixel_ray_reprojects_to_same_pixel() {
        let cam = overhead_camera(2.0);
        let (origin, dir) = cam.pixel_ray([1100.0, 300.0]).expect("ray");
        let point = origin + dir * 1.7;
        let px = cam.project(&point).expect("in front");
        assert!((px[0] - 1100.0).abs() < 1e-6 && (px[1] - 300.0).abs() < 1e-6);
    }
}
