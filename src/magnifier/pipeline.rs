//! One pass of the magnifier over a single camera frame.
//!
//! Stages, in order: re-locate the target plane by identity, build the
//! frame's camera, run the bounds search, project the chosen corners, label
//! them, and warp. Any stage can end the pass with a [`SkipReason`].
use super::outcome::{RectifiedFrame, SkipReason};
use super::params::MagnifierParams;
use super::session::TrackingTarget;
use crate::bounds;
use crate::camera::Camera;
use crate::corners::{corners_for, project_plane_center};
use crate::diagnostics::{BoundsStage, CornerSample, FrameTrace};
use crate::rectify::{rectification_roles, rectify};
use crate::types::CameraFrame;
use log::debug;
use std::time::Instant;

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Run the pipeline for `target` on `frame`, recording into `trace`.
pub(crate) fn run_frame(
    frame: &CameraFrame<'_>,
    target: &TrackingTarget,
    params: &MagnifierParams,
    trace: &mut FrameTrace,
) -> Result<RectifiedFrame, SkipReason> {
    trace.timestamp = frame.timestamp;
    trace.anchor_id = Some(target.anchor_id);

    let anchor = frame
        .anchor(target.anchor_id)
        .ok_or(SkipReason::PlaneNotFound(target.anchor_id))?;
    let camera = Camera::new(frame.pose, frame.intrinsics).ok_or(SkipReason::NonInvertiblePose)?;
    trace.tap_pixel = camera.project(&target.tap_point);
    trace.center_pixel = project_plane_center(&camera, anchor).map(|c| c.pixel);

    let bounds_start = Instant::now();
    let initial = anchor.local_extent();
    let y = anchor.local_y();
    let adjustment = bounds::adjust(
        &camera,
        &anchor.transform,
        &initial,
        y,
        frame.size(),
        &params.bounds,
    );
    trace.timing.push("bounds", elapsed_ms(bounds_start));
    trace.bounds = Some(BoundsStage {
        initial,
        chosen: adjustment.extent,
        ratio: adjustment.ratio,
        candidates_evaluated: adjustment.evaluated,
    });

    let corners = corners_for(&camera, &anchor.transform, &adjustment.extent, y)
        .ok_or(SkipReason::CornerNotProjectable)?;
    let pixels = corners.map(|c| c.pixel);
    let roles = rectification_roles(&pixels, frame.image.h);
    trace.corners = corners
        .iter()
        .zip(roles)
        .map(|(c, role)| CornerSample {
            pixel: c.pixel,
            world: [c.world.x, c.world.y, c.world.z],
            role,
        })
        .collect();

    let rectify_start = Instant::now();
    let rectified = rectify(&frame.image, &pixels, &roles, &params.rectify);
    trace.timing.push("rectify", elapsed_ms(rectify_start));
    let rectified = rectified?;
    trace.output_size = Some((rectified.image.w, rectified.image.h));
    debug!(
        "magnifier: anchor {:?} ratio={:?} output={}x{}",
        target.anchor_id, adjustment.ratio, rectified.image.w, rectified.image.h
    );

    Ok(RectifiedFrame {
        image: rectified.image,
        corners,
        roles,
        extent: adjustment.extent,
        shrink_ratio: adjustment.ratio,
        src_from_out: rectified.src_from_out,
    })
}
