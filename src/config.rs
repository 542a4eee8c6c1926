//! JSON configuration for the `synthetic_magnifier` demo.
//!
//! Example:
//! ```json
//! {
//!   "camera": {
//!     "width": 640, "height": 480,
//!     "fx": 500.0, "fy": 500.0,
//!     "eye": [0.0, 1.2, 0.9], "target": [0.0, 0.0, 0.0], "up": [0.0, 0.0, -1.0]
//!   },
//!   "plane": { "extent": [1.0, 0.7], "cell": 0.1 },
//!   "tap": [320.0, 240.0],
//!   "params": { "rectify": { "orientation": "native" } },
//!   "output": { "captured": "out/captured.png", "rectified": "out/rectified.png", "report": "out/report.json" }
//! }
//! ```
use crate::camera::{intrinsics_matrix, look_at};
use crate::magnifier::MagnifierParams;
use crate::types::{AnchorId, PlaneAnchor, Pixel};
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct CameraConfig {
    pub width: usize,
    pub height: usize,
    pub fx: f64,
    pub fy: f64,
    /// Principal point; defaults to the image center.
    #[serde(default)]
    pub cx: Option<f64>,
    #[serde(default)]
    pub cy: Option<f64>,
    pub eye: [f64; 3],
    pub target: [f64; 3],
    pub up: [f64; 3],
}

impl CameraConfig {
    pub fn intrinsics(&self) -> Matrix3<f64> {
        intrinsics_matrix(
            self.fx,
            self.fy,
            self.cx.unwrap_or(self.width as f64 * 0.5),
            self.cy.unwrap_or(self.height as f64 * 0.5),
        )
    }

    pub fn pose(&self) -> Result<Matrix4<f64>, String> {
        let [ex, ey, ez] = self.eye;
        let [tx, ty, tz] = self.target;
        let [ux, uy, uz] = self.up;
        look_at(
            Point3::new(ex, ey, ez),
            Point3::new(tx, ty, tz),
            Vector3::new(ux, uy, uz),
        )
        .ok_or_else(|| "Camera eye, target and up do not define a pose".to_string())
    }
}

/// A single horizontal plane anchor with a checkerboard texture.
#[derive(Clone, Debug, Deserialize)]
pub struct PlaneConfig {
    #[serde(default)]
    pub center: [f64; 3],
    pub extent: [f64; 2],
    /// Checkerboard cell size in plane units.
    #[serde(default = "default_cell")]
    pub cell: f64,
}

fn default_cell() -> f64 {
    0.1
}

impl PlaneConfig {
    pub fn anchor(&self) -> PlaneAnchor {
        PlaneAnchor {
            id: AnchorId(1),
            transform: Matrix4::identity(),
            center: self.center,
            extent: self.extent,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct DemoOutputConfig {
    pub captured: Option<PathBuf>,
    pub rectified: PathBuf,
    pub report: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DemoConfig {
    /// Captured frame to use instead of rendering the plane.
    #[serde(default)]
    pub input: Option<PathBuf>,
    pub camera: CameraConfig,
    pub plane: PlaneConfig,
    /// Tap pixel used to select the target; defaults to the image center.
    #[serde(default)]
    pub tap: Option<Pixel>,
    #[serde(default)]
    pub params: MagnifierParams,
    pub output: DemoOutputConfig,
}

impl DemoConfig {
    pub fn tap_pixel(&self) -> Pixel {
        self.tap.unwrap_or([
            self.camera.width as f64 * 0.5,
            self.camera.height as f64 * 0.5,
        ])
    }
}

pub fn load_config(path: &Path) -> Result<DemoConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rectify::OutputOrientation;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let json = r#"{
            "camera": { "width": 640, "height": 480, "fx": 500.0, "fy": 500.0,
                        "eye": [0.0, 1.0, 0.0], "target": [0.0, 0.0, 0.0], "up": [0.0, 0.0, -1.0] },
            "plane": { "extent": [1.0, 0.5] },
            "output": { "rectified": "out.png" }
        }"#;
        let cfg: DemoConfig = serde_json::from_str(json).expect("valid config");
        assert!(cfg.input.is_none());
        assert_eq!(cfg.tap_pixel(), [320.0, 240.0]);
        assert_eq!(cfg.plane.cell, 0.1);
        assert_eq!(cfg.params.rectify.orientation, OutputOrientation::Rotate90);
        let k = cfg.camera.intrinsics();
        assert_eq!((k[(0, 2)], k[(1, 2)]), (320.0, 240.0));
        assert!(cfg.camera.pose().is_ok());
    }

    #[test]
    fn degenerate_camera_is_an_error() {
        let cam = CameraConfig {
            width: 10,
            height: 10,
            fx: 1.0,
            fy: 1.0,
            cx: None,
            cy: None,
            eye: [0.0, 1.0, 0.0],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
        };
        assert!(cam.pose().is_err());
    }
}
