//! Ray-cast renderer for synthetic scenes made of textured plane anchors.
//!
//! Each output pixel center `(u + 0.5, v + 0.5)` is back-projected through
//! the camera and intersected with every anchor. The nearest hit is shaded by
//! a texture callback that receives the anchor identity and the plane-local
//! `(x, z)` coordinate; misses get the background value.
use crate::camera::Camera;
use crate::image::ImageBufU8;
use crate::target::intersect_local;
use crate::types::{AnchorId, PlaneAnchor};
use nalgebra::Matrix4;

/// Render `anchors` as seen by `camera` into a `width × height` buffer.
///
/// `texture` writes one pixel (`channels` samples) for a plane-local point.
pub fn render_planes<F>(
    camera: &Camera,
    anchors: &[PlaneAnchor],
    width: usize,
    height: usize,
    channels: usize,
    background: u8,
    texture: F,
) -> ImageBufU8
where
    F: Fn(AnchorId, [f64; 2], &mut [u8]) + Sync,
{
    let mut out = ImageBufU8::new(width, height, channels, background);
    if out.data.is_empty() {
        return out;
    }
    let planes: Vec<(&PlaneAnchor, Matrix4<f64>)> = anchors
        .iter()
        .filter_map(|a| a.transform.try_inverse().map(|inv| (a, inv)))
        .collect();

    let shade_row = |(v, row): (usize, &mut [u8])| {
        for (u, px) in row.chunks_exact_mut(channels).enumerate() {
            let Some((origin, dir)) = camera.pixel_ray([u as f64 + 0.5, v as f64 + 0.5]) else {
                continue;
            };
            let nearest = planes
                .iter()
                .filter_map(|(anchor, to_local)| {
                    let (local, _) = intersect_local(to_local, &origin, &dir, anchor)?;
                    let world = anchor.transform.transform_point(&local);
                    Some((anchor.id, local, (world - origin).norm()))
                })
                .min_by(|a, b| a.2.total_cmp(&b.2));
            if let Some((id, local, _)) = nearest {
                texture(id, [local.x, local.z], px);
            }
        }
    };

    let row_len = width * channels;
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        out.data.par_chunks_mut(row_len).enumerate().for_each(shade_row);
    }
    #[cfg(not(feature = "parallel"))]
    out.data.chunks_mut(row_len).enumerate().for_each(shade_row);
    out
}

/// Checkerboard texture with square cells of `cell` plane units.
pub fn checker_texture(cell: f64, dark: u8, light: u8) -> impl Fn(AnchorId, [f64; 2], &mut [u8]) + Sync {
    move |_, [x, z], px| {
        let parity = ((x / cell).floor() as i64 + (z / cell).floor() as i64).rem_euclid(2);
        px.fill(if parity == 0 { dark } else { light });
    }
}
