mod common;

use common::synthetic_scene::{floor_anchor, init_logging, intrinsics, oblique_pose, Scene};
use plane_magnifier::camera::Camera;
use plane_magnifier::corners::corners_for;
use plane_magnifier::homography::apply_homography;
use plane_magnifier::rectify::{rectification_roles, rectify, OutputOrientation, RectifyParams};
use plane_magnifier::synthetic::checker_texture;
use plane_magnifier::types::AnchorId;

const CELL: f64 = 0.35;
const DARK: u8 = 30;
const LIGHT: u8 = 225;

#[test]
fn oblique_checkerboard_is_recovered_fronto_parallel() {
    init_logging();
    let anchor = floor_anchor(1, [0.0; 3], [1.0, 0.7]);
    let extent = anchor.local_extent();
    let scene = Scene::render(oblique_pose(), vec![anchor], checker_texture(CELL, DARK, LIGHT));
    let camera = Camera::new(scene.pose, intrinsics()).expect("rigid pose");
    let corners = corners_for(&camera, &scene.anchors[0].transform, &extent, 0.0)
        .expect("plane in front of the camera")
        .map(|c| c.pixel);

    let image = scene.pixels.as_view();
    let roles = rectification_roles(&corners, image.h);
    let params = RectifyParams {
        orientation: OutputOrientation::Native,
        ..RectifyParams::default()
    };
    let out = rectify(&image, &corners, &roles, &params).expect("rectified");
    let (w, h) = out.upright_size;

    // The upright output is an axis-aligned scaling of the plane extent, so
    // each output pixel center has a known texture value.
    let texture = checker_texture(CELL, DARK, LIGHT);
    let border = 3;
    let (mut total, mut matching) = (0usize, 0usize);
    for y in border..h - border {
        for x in border..w - border {
            let lx = extent.x[0] + (x as f64 + 0.5) / w as f64 * extent.width();
            let lz = extent.z[0] + (y as f64 + 0.5) / h as f64 * extent.depth();
            let mut expected = [0u8];
            texture(AnchorId(1), [lx, lz], &mut expected[..]);
            let got = out.image.get(x, y, 0);
            total += 1;
            if got.abs_diff(expected[0]) < (LIGHT - DARK) / 2 {
                matching += 1;
            }
        }
    }
    let ratio = matching as f64 / total as f64;
    assert!(ratio > 0.9, "only {matching}/{total} pixels match the texture");
}

#[test]
fn output_corners_map_back_to_the_quad() {
    let anchor = floor_anchor(1, [0.0; 3], [1.0, 0.7]);
    let extent = anchor.local_extent();
    let scene = Scene::render(oblique_pose(), vec![anchor], checker_texture(CELL, DARK, LIGHT));
    let camera = Camera::new(scene.pose, intrinsics()).expect("rigid pose");
    let corners = corners_for(&camera, &scene.anchors[0].transform, &extent, 0.0)
        .expect("plane in front of the camera")
        .map(|c| c.pixel);
    let image = scene.pixels.as_view();
    let roles = rectification_roles(&corners, image.h);
    let out = rectify(&image, &corners, &roles, &RectifyParams::default()).expect("rectified");
    let (w, h) = out.upright_size;
    assert_eq!((out.image.w, out.image.h), (h, w));

    // Enumeration order is (x0,z0), (x0,z1), (x1,z0), (x1,z1); the camera looks
    // towards -z, so z0 is the far (upper) edge of the output.
    let expected = [
        ([0.0, 0.0], corners[0]),
        ([0.0, h as f64], corners[1]),
        ([w as f64, 0.0], corners[2]),
        ([w as f64, h as f64], corners[3]),
    ];
    for (out_px, src_px) in expected {
        let mapped = apply_homography(&out.src_from_out, out_px).expect("finite");
        assert!(
            (mapped[0] - src_px[0]).abs() < 1e-6 && (mapped[1] - src_px[1]).abs() < 1e-6,
            "{out_px:?} mapped to {mapped:?}, expected {src_px:?}"
        );
    }
}
