//! Plane extent corners and their projections.
//!
//! Corners are enumerated in the fixed order `(x0,z0), (x0,z1), (x1,z0),
//! (x1,z1)`. That order says nothing about where a corner lands on screen;
//! screen roles are assigned later by [`crate::roles::classify`].
use crate::camera::Camera;
use crate::types::{Extent, PlaneAnchor, Pixel, ProjectedCorner};
use nalgebra::{Matrix4, Point3};

/// World points for every combination of `xs × zs` at plane-local `y`.
///
/// Iterates x-major: all z values for `xs[0]`, then for `xs[1]`, and so on.
pub fn world_points(transform: &Matrix4<f64>, xs: &[f64], y: f64, zs: &[f64]) -> Vec<Point3<f64>> {
    let mut out = Vec::with_capacity(xs.len() * zs.len());
    for &x in xs {
        for &z in zs {
            out.push(transform.transform_point(&Point3::new(x, y, z)));
        }
    }
    out
}

/// Project every combination of `xs × zs`; `None` marks a point behind the camera.
pub fn project_bound_grid(
    camera: &Camera,
    transform: &Matrix4<f64>,
    xs: &[f64],
    y: f64,
    zs: &[f64],
) -> Vec<Option<ProjectedCorner>> {
    world_points(transform, xs, y, zs)
        .into_iter()
        .map(|world| camera.project(&world).map(|pixel| ProjectedCorner { pixel, world }))
        .collect()
}

/// The four extent corners as world points, in enumeration order.
pub fn world_corners(transform: &Matrix4<f64>, extent: &Extent, y: f64) -> [Point3<f64>; 4] {
    let [x0, x1] = extent.x;
    let [z0, z1] = extent.z;
    [(x0, z0), (x0, z1), (x1, z0), (x1, z1)]
        .map(|(x, z)| transform.transform_point(&Point3::new(x, y, z)))
}

/// Per-corner projections; individual corners may be unprojectable.
pub fn project_corners(
    camera: &Camera,
    transform: &Matrix4<f64>,
    extent: &Extent,
    y: f64,
) -> [Option<Pixel>; 4] {
    world_corners(transform, extent, y).map(|p| camera.project(&p))
}

/// Project all four corners, or `None` if any of them is behind the camera.
pub fn corners_for(
    camera: &Camera,
    transform: &Matrix4<f64>,
    extent: &Extent,
    y: f64,
) -> Option<[ProjectedCorner; 4]> {
    let world = world_corners(transform, extent, y);
    let mut out = [ProjectedCorner {
        pixel: [0.0, 0.0],
        world: Point3::origin(),
    }; 4];
    for (slot, p) in out.iter_mut().zip(world) {
        *slot = ProjectedCorner {
            pixel: camera.project(&p)?,
            world: p,
        };
    }
    Some(out)
}

/// Projection of the anchor's center, used as a reference point.
pub fn project_plane_center(camera: &Camera, anchor: &PlaneAnchor) -> Option<ProjectedCorner> {
    let [cx, cy, cz] = anchor.center;
    project_bound_grid(camera, &anchor.transform, &[cx], cy, &[cz])
        .into_iter()
        .next()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{intrinsics_matrix, look_at};
    use crate::types::AnchorId;
    use nalgebra::Vector3;

    fn overhead_camera() -> Camera {
        let pose = look_at(
            Point3::new(0.0, 2.0, 0.0),
            Point3::origin(),
            Vector3::new(0.0, 0.0, -1.0),
        )
        .expect("valid look-at");
        Camera::new(pose, intrinsics_matrix(1000.0, 1000.0, 960.0, 540.0)).expect("rigid pose")
    }

    #[test]
    fn corners_follow_enumeration_order() {
        let cam = overhead_camera();
        let extent = Extent::new([-0.5, 0.5], [-0.25, 0.25]);
        let corners = corners_for(&cam, &Matrix4::identity(), &extent, 0.0).expect("visible");
        let expected = [[710.0, 415.0], [710.0, 665.0], [1210.0, 415.0], [1210.0, 665.0]];
        for (corner, want) in corners.iter().zip(expected) {
            assert!(
                (corner.pixel[0] - want[0]).abs() < 1e-9 && (corner.pixel[1] - want[1]).abs() < 1e-9,
                "got {:?}, want {:?}",
                corner.pixel,
                want
            );
        }
        assert_eq!(corners[3].world, Point3::new(0.5, 0.0, 0.25));
    }

    #[test]
    fn plane_transform_is_applied_before_projection() {
        let cam = overhead_camera();
        let mut transform = Matrix4::identity();
        transform[(0, 3)] = 0.1;
        let shifted = project_corners(&cam, &transform, &Extent::new([0.0, 0.0], [0.0, 0.0]), 0.0);
        let px = shifted[0].expect("visible");
        assert!((px[0] - 1010.0).abs() < 1e-9);
        assert!((px[1] - 540.0).abs() < 1e-9);
    }

    #[test]
    fn single_value_bounds_give_the_center() {
        let cam = overhead_camera();
        let anchor = PlaneAnchor {
            id: AnchorId(1),
            transform: Matrix4::identity(),
            center: [0.2, 0.0, -0.1],
            extent: [1.0, 1.0],
        };
        let center = project_plane_center(&cam, &anchor).expect("visible");
        assert!((center.pixel[0] - 1060.0).abs() < 1e-9);
        assert!((center.pixel[1] - 490.0).abs() < 1e-9);
        assert_eq!(world_points(&anchor.transform, &[1.0, 2.0], 0.0, &[3.0]).len(), 2);
    }

    #[test]
    fn any_corner_behind_camera_fails_the_set() {
        let cam = Camera::new(Matrix4::identity(), intrinsics_matrix(500.0, 500.0, 320.0, 240.0))
            .expect("identity pose");
        // Plane at local y = 0 rotated to face the camera, spanning z through the camera.
        let mut transform = Matrix4::identity();
        transform[(1, 3)] = -1.0;
        let extent = Extent::new([-1.0, 1.0], [-4.0, 1.0]);
        let partial = project_corners(&cam, &transform, &extent, 0.0);
        assert!(partial[0].is_some());
        assert!(partial[1].is_none());
        assert!(corners_for(&cam, &transform, &extent, 0.0).is_none());
    }
}
