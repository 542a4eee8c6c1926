//! Four-point perspective correction.
//!
//! The rectifier works in a bottom-left-origin frame: every captured pixel
//! coordinate goes through [`to_bottom_left_origin`] before roles are applied,
//! and the output rectangle is laid out with its bottom-left corner at the
//! origin. The quadrilateral keyed by [`CornerRole`] is mapped onto an upright
//! rectangle whose size follows the quad's longest opposite edges. Output
//! pixels are filled by inverse mapping into the source with bilinear
//! interpolation, then the result is turned by the configured
//! [`OutputOrientation`] to match the display.
use crate::homography::{apply_homography, homography_from_quad};
use crate::image::{ImageBufU8, ImageU8, ImageView};
use crate::roles::{classify, CornerQuad, CornerRole};
use crate::types::Pixel;
use log::{debug, trace};
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Quads smaller than this (in square pixels) are treated as degenerate.
const MIN_QUAD_AREA: f64 = 1.0;

/// Clockwise rotation applied to the upright rectified image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputOrientation {
    Native,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl OutputOrientation {
    pub fn apply(self, image: ImageBufU8) -> ImageBufU8 {
        match self {
            OutputOrientation::Native => image,
            OutputOrientation::Rotate90 => image.rotate90_cw(),
            OutputOrientation::Rotate180 => image.rotate180(),
            OutputOrientation::Rotate270 => image.rotate90_ccw(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifyParams {
    /// Rotation compensating the sensor's native orientation.
    pub orientation: OutputOrientation,
    /// Cap on the longer output side, in pixels.
    pub max_output_side: usize,
    /// Sample value written where the inverse mapping leaves the source.
    pub fill: u8,
}

impl Default for RectifyParams {
    fn default() -> Self {
        Self {
            orientation: OutputOrientation::Rotate90,
            max_output_side: 2048,
            fill: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RectifyError {
    #[error("source image is empty")]
    EmptySource,
    #[error("corner roles do not describe a quadrilateral")]
    DegenerateQuad,
    #[error("quadrilateral does not intersect the source image")]
    NoIntersection,
}

#[derive(Clone, Debug)]
pub struct RectifiedImage {
    /// Warped pixels after the orientation step.
    pub image: ImageBufU8,
    /// Quad in the bottom-left-origin frame.
    pub quad: CornerQuad,
    /// Maps upright output pixels (top-left origin, before rotation) to
    /// captured-image pixels.
    pub src_from_out: Matrix3<f64>,
    /// Output size before the orientation step.
    pub upright_size: (usize, usize),
}

/// Captured pixel (top-left origin, y down) to the rectifier's frame
/// (bottom-left origin, y up). Its own inverse.
#[inline]
pub fn to_bottom_left_origin(p: Pixel, image_height: f64) -> Pixel {
    [p[0], image_height - p[1]]
}

/// Inverse of [`to_bottom_left_origin`].
#[inline]
pub fn from_bottom_left_origin(p: Pixel, image_height: f64) -> Pixel {
    to_bottom_left_origin(p, image_height)
}

/// [`to_bottom_left_origin`] as a homogeneous transform.
pub fn flip_y(height: f64) -> Matrix3<f64> {
    Matrix3::new(1.0, 0.0, 0.0, 0.0, -1.0, height, 0.0, 0.0, 1.0)
}

/// Roles for captured-pixel corners, classified in the rectifier's frame so
/// that "bottom" is visually lower in the captured image.
pub fn rectification_roles(corners: &[Pixel; 4], image_height: usize) -> [CornerRole; 4] {
    let h = image_height as f64;
    classify(&corners.map(|p| to_bottom_left_origin(p, h)))
}

fn dist(a: Pixel, b: Pixel) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

fn intersects_frame(corners: &[Pixel; 4], w: f64, h: f64) -> bool {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in corners {
        min_x = min_x.min(p[0]);
        max_x = max_x.max(p[0]);
        min_y = min_y.min(p[1]);
        max_y = max_y.max(p[1]);
    }
    max_x > 0.0 && min_x < w && max_y > 0.0 && min_y < h
}

/// Upright output size for `quad`, capped so the longer side is at most `max_side`.
fn output_size(quad: &CornerQuad, max_side: usize) -> (usize, usize) {
    let w = dist(quad.bottom_left, quad.bottom_right).max(dist(quad.top_left, quad.top_right));
    let h = dist(quad.bottom_left, quad.top_left).max(dist(quad.bottom_right, quad.top_right));
    let longest = w.max(h);
    let scale = if longest > max_side.max(1) as f64 {
        max_side.max(1) as f64 / longest
    } else {
        1.0
    };
    let ow = (w * scale).round().max(1.0) as usize;
    let oh = (h * scale).round().max(1.0) as usize;
    (ow, oh)
}

/// Bilinear sample at a continuous sample position (pixel centers on integers).
///
/// Returns `false` and leaves `out` untouched outside the sampleable area.
#[inline]
pub fn sample_bilinear(img: &ImageU8<'_>, x: f64, y: f64, out: &mut [u8]) -> bool {
    if img.is_empty() || !x.is_finite() || !y.is_finite() {
        return false;
    }
    let (max_x, max_y) = ((img.w - 1) as f64, (img.h - 1) as f64);
    if x < 0.0 || y < 0.0 || x > max_x || y > max_y {
        return false;
    }
    let (xf, yf) = (x.floor(), y.floor());
    let (x0, y0) = (xf as usize, yf as usize);
    let x1 = (x0 + 1).min(img.w - 1);
    let y1 = (y0 + 1).min(img.h - 1);
    let (tx, ty) = (x - xf, y - yf);
    for (c, slot) in out.iter_mut().enumerate().take(img.channels) {
        let top = img.get(x0, y0, c) as f64 * (1.0 - tx) + img.get(x1, y0, c) as f64 * tx;
        let bottom = img.get(x0, y1, c) as f64 * (1.0 - tx) + img.get(x1, y1, c) as f64 * tx;
        *slot = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8;
    }
    true
}

fn warp_row(
    image: &ImageU8<'_>,
    src_from_out: &Matrix3<f64>,
    fill: u8,
    y: usize,
    row: &mut [u8],
) {
    let c = image.channels;
    for (x, px) in row.chunks_exact_mut(c).enumerate() {
        let hit = apply_homography(src_from_out, [x as f64 + 0.5, y as f64 + 0.5])
            .is_some_and(|p| sample_bilinear(image, p[0] - 0.5, p[1] - 0.5, px));
        if !hit {
            px.fill(fill);
        }
    }
}

/// Warp the quad described by `corners` and `roles` into an upright rectangle.
///
/// `corners` are captured-image pixels; `roles` must label them in the
/// bottom-left-origin frame (see [`rectification_roles`]).
pub fn rectify(
    image: &ImageU8<'_>,
    corners: &[Pixel; 4],
    roles: &[CornerRole; 4],
    params: &RectifyParams,
) -> Result<RectifiedImage, RectifyError> {
    if image.is_empty() || image.channels == 0 {
        return Err(RectifyError::EmptySource);
    }
    if corners.iter().flatten().any(|v| !v.is_finite()) {
        return Err(RectifyError::DegenerateQuad);
    }
    let (img_w, img_h) = (image.w as f64, image.h as f64);
    if !intersects_frame(corners, img_w, img_h) {
        trace!("rectify: quad {corners:?} misses the {img_w}x{img_h} frame");
        return Err(RectifyError::NoIntersection);
    }

    let bl_corners = corners.map(|p| to_bottom_left_origin(p, img_h));
    let quad = CornerQuad::from_roles(&bl_corners, roles).ok_or(RectifyError::DegenerateQuad)?;
    if quad.area() < MIN_QUAD_AREA {
        return Err(RectifyError::DegenerateQuad);
    }

    let (out_w, out_h) = output_size(&quad, params.max_output_side);
    let (fw, fh) = (out_w as f64, out_h as f64);
    let out_rect = [[0.0, 0.0], [fw, 0.0], [0.0, fh], [fw, fh]];
    let src_bl_from_out_bl =
        homography_from_quad(&out_rect, &quad.points()).ok_or(RectifyError::DegenerateQuad)?;
    let src_from_out = flip_y(img_h) * src_bl_from_out_bl * flip_y(fh);
    debug!("rectify: {out_w}x{out_h} output, area={:.1}", quad.area());

    let mut upright = ImageBufU8::new(out_w, out_h, image.channels, params.fill);
    let row_len = out_w * image.channels;
    let fill = params.fill;
    let fill_row = |(y, row): (usize, &mut [u8])| warp_row(image, &src_from_out, fill, y, row);

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        upright.data.par_chunks_mut(row_len).enumerate().for_each(fill_row);
    }
    #[cfg(not(feature = "parallel"))]
    upright.data.chunks_mut(row_len).enumerate().for_each(fill_row);

    Ok(RectifiedImage {
        image: params.orientation.apply(upright),
        quad,
        src_from_out,
        upright_size: (out_w, out_h),
    })
}
