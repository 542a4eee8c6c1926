use nalgebra::{Matrix3, Matrix4};
use plane_magnifier::camera::Camera;
use plane_magnifier::config::{load_config, DemoConfig};
use plane_magnifier::image::io::{load_image, save_image, write_json_file};
use plane_magnifier::image::ImageBufU8;
use plane_magnifier::magnifier::{FrameOutcome, FrameReport, MagnifierSession};
use plane_magnifier::synthetic::{checker_texture, render_planes};
use plane_magnifier::types::{CameraFrame, PlaneAnchor};
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage(program: &str) -> String {
    format!("Usage: {program} <config.json>")
}

fn run() -> Result<(), String> {
    let mut args = env::args();
    let program = args
        .next()
        .unwrap_or_else(|| "synthetic_magnifier".to_string());
    let config_path = args.next().map(PathBuf::from).ok_or_else(|| usage(&program))?;
    let config = load_config(&config_path)?;

    let intrinsics = config.camera.intrinsics();
    let pose = config.camera.pose()?;
    let anchors = vec![config.plane.anchor()];
    let captured = capture(&config, pose, intrinsics, &anchors)?;
    if let Some(path) = &config.output.captured {
        save_image(&captured, path)?;
    }

    let frame = CameraFrame {
        timestamp: 0.0,
        intrinsics,
        pose,
        image: captured.as_view(),
        anchors: &anchors,
    };
    let mut session = MagnifierSession::new(config.params.clone());
    let tap = config.tap_pixel();
    let target = session
        .select_target_at(&frame, tap)
        .ok_or_else(|| format!("Tap at [{:.1}, {:.1}] does not hit the plane", tap[0], tap[1]))?;
    println!(
        "Target: anchor {:?} at [{:.3}, {:.3}, {:.3}]",
        target.anchor_id, target.tap_point.x, target.tap_point.y, target.tap_point.z
    );

    let report = session.process_frame_with_diagnostics(&frame);
    print_summary(&report);
    if let Some(path) = &config.output.report {
        write_json_file(path, &report.trace)?;
        println!("JSON report written to {}", path.display());
    }
    match &report.outcome {
        FrameOutcome::Rectified(rectified) => {
            save_image(&rectified.image, &config.output.rectified)?;
            println!("Rectified image written to {}", config.output.rectified.display());
            Ok(())
        }
        FrameOutcome::Skipped(reason) => Err(format!("Frame skipped: {reason}")),
    }
}

fn capture(
    config: &DemoConfig,
    pose: Matrix4<f64>,
    intrinsics: Matrix3<f64>,
    anchors: &[PlaneAnchor],
) -> Result<ImageBufU8, String> {
    if let Some(path) = &config.input {
        return load_image(path);
    }
    let camera = Camera::new(pose, intrinsics).ok_or("Camera pose is not invertible")?;
    Ok(render_planes(
        &camera,
        anchors,
        config.camera.width,
        config.camera.height,
        3,
        90,
        checker_texture(config.plane.cell, 30, 225),
    ))
}

fn print_summary(report: &FrameReport) {
    let trace = &report.trace;
    println!("Frame summary");
    if let Some(bounds) = &trace.bounds {
        println!(
            "  bounds: x=[{:.3}, {:.3}] z=[{:.3}, {:.3}] ratio={} evaluated={}",
            bounds.chosen.x[0],
            bounds.chosen.x[1],
            bounds.chosen.z[0],
            bounds.chosen.z[1],
            format_opt(bounds.ratio),
            bounds.candidates_evaluated
        );
    }
    for corner in &trace.corners {
        println!(
            "  {:?}: [{:.1}, {:.1}]",
            corner.role, corner.pixel[0], corner.pixel[1]
        );
    }
    if let Some((w, h)) = trace.output_size {
        println!("  output: {w}x{h}");
    }
    if let Some(reason) = &trace.skipped {
        println!("  skipped: {reason}");
    }
    println!("  total_ms: {:.3}", trace.timing.total_ms);
    for stage in &trace.timing.stages {
        println!("    {}: {:.3}", stage.label, stage.elapsed_ms);
    }
}

fn format_opt(val: Option<f64>) -> String {
    val.map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "-".to_string())
}
