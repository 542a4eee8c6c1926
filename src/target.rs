//! Target selection: which tracked plane, and where on it, did the user tap?
//!
//! The tap pixel's viewing ray is intersected with every anchor's plane
//! (plane-local `y == center.y`). Hits outside an anchor's extent or behind
//! the camera are ignored; the nearest remaining hit wins.
use crate::camera::Camera;
use crate::types::{AnchorId, CameraFrame, Pixel, PlaneAnchor};
use log::debug;
use nalgebra::{Matrix4, Point3, Vector3};
use serde::Serialize;

const EPS: f64 = 1e-12;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetHit {
    pub anchor_id: AnchorId,
    /// Tapped point in world coordinates.
    pub point: Point3<f64>,
    /// Distance from the camera center along the ray.
    pub distance: f64,
}

/// Plane-local intersection of a world ray with an anchor's plane.
///
/// `to_local` is the inverse of `anchor.transform`. Returns the local hit
/// point and the ray parameter, or `None` when the ray is parallel, points
/// away, or lands outside the anchor's extent.
pub(crate) fn intersect_local(
    to_local: &Matrix4<f64>,
    origin: &Point3<f64>,
    dir: &Vector3<f64>,
    anchor: &PlaneAnchor,
) -> Option<(Point3<f64>, f64)> {
    let o = to_local.transform_point(origin);
    let d = to_local.transform_vector(dir);
    if d.y.abs() <= EPS {
        return None;
    }
    let t = (anchor.local_y() - o.y) / d.y;
    if !t.is_finite() || t <= 0.0 {
        return None;
    }
    let local = o + d * t;
    let extent = anchor.local_extent();
    let inside = local.x >= extent.x[0]
        && local.x <= extent.x[1]
        && local.z >= extent.z[0]
        && local.z <= extent.z[1];
    inside.then_some((local, t))
}

fn intersect_anchor(
    origin: &Point3<f64>,
    dir: &Vector3<f64>,
    anchor: &PlaneAnchor,
) -> Option<(Point3<f64>, f64)> {
    let to_local = anchor.transform.try_inverse()?;
    let (local, _) = intersect_local(&to_local, origin, dir, anchor)?;
    let world = anchor.transform.transform_point(&local);
    Some((world, (world - origin).norm()))
}

/// Nearest anchor hit by the viewing ray through `pixel`.
pub fn hit_test(camera: &Camera, anchors: &[PlaneAnchor], pixel: Pixel) -> Option<TargetHit> {
    let (origin, dir) = camera.pixel_ray(pixel)?;
    anchors
        .iter()
        .filter_map(|anchor| {
            intersect_anchor(&origin, &dir, anchor).map(|(point, distance)| TargetHit {
                anchor_id: anchor.id,
                point,
                distance,
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// [`hit_test`] against the anchors and camera of `frame`.
pub fn select_target(frame: &CameraFrame<'_>, pixel: Pixel) -> Option<TargetHit> {
    let camera = Camera::new(frame.pose, frame.intrinsics)?;
    let hit = hit_test(&camera, frame.anchors, pixel);
    match &hit {
        Some(h) => debug!(
            "target: pixel {pixel:?} hit anchor {:?} at {:.3} m",
            h.anchor_id, h.distance
        ),
        None => debug!("target: pixel {pixel:?} hit no anchor"),
    }
    hit
}
