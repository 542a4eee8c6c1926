//! I/O helpers for 8-bit images and JSON.
//!
//! - `load_image`: read a PNG/JPEG/etc. into an owned RGB buffer.
//! - `save_image`: write an owned gray/RGB/RGBA buffer to disk.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageBufU8, ImageView};
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit RGB.
pub fn load_image(path: &Path) -> Result<ImageBufU8, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    ImageBufU8::from_raw(w, h, 3, img.into_raw())
        .ok_or_else(|| format!("Unexpected buffer size for {}", path.display()))
}

/// Save an owned buffer; the encoder is chosen from the file extension.
pub fn save_image(buffer: &ImageBufU8, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let (w, h) = (buffer.width() as u32, buffer.height() as u32);
    let mut data = Vec::with_capacity(buffer.data.len());
    for row in buffer.rows() {
        data.extend_from_slice(row);
    }
    let invalid = || format!("Failed to create image buffer for {}", path.display());
    let image = match buffer.channels() {
        1 => DynamicImage::ImageLuma8(GrayImage::from_raw(w, h, data).ok_or_else(invalid)?),
        3 => DynamicImage::ImageRgb8(RgbImage::from_raw(w, h, data).ok_or_else(invalid)?),
        4 => DynamicImage::ImageRgba8(RgbaImage::from_raw(w, h, data).ok_or_else(invalid)?),
        c => return Err(format!("Unsupported channel count {c} for {}", path.display())),
    };
    image
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trip_preserves_rgb_samples() {
        let dir = std::env::temp_dir().join(format!("plane_magnifier_io_{}", std::process::id()));
        let path = dir.join("nested").join("tile.png");
        let data: Vec<u8> = (0..4 * 3 * 3).map(|v| (v * 7) as u8).collect();
        let buf = ImageBufU8::from_raw(4, 3, 3, data).expect("packed");
        save_image(&buf, &path).expect("saved");
        let loaded = load_image(&path).expect("loaded");
        assert_eq!(loaded, buf);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unsupported_channel_count_is_rejected() {
        let buf = ImageBufU8::new(2, 2, 2, 0);
        let path = std::env::temp_dir().join("plane_magnifier_two_channel.png");
        assert!(save_image(&buf, &path).is_err());
    }
}
