//! Owned interleaved 8-bit image (stride == width * channels).
//!
//! Produced by the rectifier and the synthetic renderer. Quarter-turn
//! rotations are provided for display re-orientation.
use super::traits::{ImageView, ImageViewMut};
use super::ImageU8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBufU8 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Interleaved samples per pixel
    pub channels: usize,
    /// Backing storage in row-major order
    pub data: Vec<u8>,
}

impl ImageBufU8 {
    /// Construct a buffer of size `w × h` with every sample set to `fill`.
    pub fn new(w: usize, h: usize, channels: usize, fill: u8) -> Self {
        Self {
            w,
            h,
            channels,
            data: vec![fill; w * h * channels],
        }
    }

    /// Take ownership of packed samples. Returns `None` on a length mismatch.
    pub fn from_raw(w: usize, h: usize, channels: usize, data: Vec<u8>) -> Option<Self> {
        (channels > 0 && data.len() == w * h * channels).then_some(Self {
            w,
            h,
            channels,
            data,
        })
    }

    /// Borrow as a read-only view.
    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8 {
            w: self.w,
            h: self.h,
            stride: self.w * self.channels,
            channels: self.channels,
            data: &self.data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> u8 {
        self.data[(y * self.w + x) * self.channels + c]
    }

    /// Rotate a quarter turn clockwise.
    pub fn rotate90_cw(&self) -> Self {
        // dst(x, y) = src(y, h - 1 - x)
        self.remap(self.h, self.w, |x, y| (y, self.h - 1 - x))
    }

    /// Rotate a quarter turn counter-clockwise.
    pub fn rotate90_ccw(&self) -> Self {
        self.remap(self.h, self.w, |x, y| (self.w - 1 - y, x))
    }

    pub fn rotate180(&self) -> Self {
        self.remap(self.w, self.h, |x, y| (self.w - 1 - x, self.h - 1 - y))
    }

    fn remap(&self, w: usize, h: usize, src_of: impl Fn(usize, usize) -> (usize, usize)) -> Self {
        let c = self.channels;
        let mut out = Self::new(w, h, c, 0);
        for y in 0..h {
            for x in 0..w {
                let (sx, sy) = src_of(x, y);
                let src = (sy * self.w + sx) * c;
                let dst = (y * w + x) * c;
                out.data[dst..dst + c].copy_from_slice(&self.data[src..src + c]);
            }
        }
        out
    }
}

impl ImageView for ImageBufU8 {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn channels(&self) -> usize {
        self.channels
    }
    #[inline]
    fn stride(&self) -> usize {
        self.w * self.channels
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let len = self.w * self.channels;
        &self.data[y * len..(y + 1) * len]
    }
}

impl ImageViewMut for ImageBufU8 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let len = self.w * self.channels;
        &mut self.data[y * len..(y + 1) * len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: usize, h: usize) -> ImageBufU8 {
        let data = (0..w * h).map(|i| i as u8).collect();
        ImageBufU8::from_raw(w, h, 1, data).expect("packed ramp")
    }

    #[test]
    fn clockwise_rotation_moves_bottom_left_to_top_left() {
        let img = ramp(3, 2);
        let rot = img.rotate90_cw();
        assert_eq!((rot.w, rot.h), (2, 3));
        assert_eq!(rot.get(0, 0, 0), img.get(0, 1, 0));
        assert_eq!(rot.get(1, 0, 0), img.get(0, 0, 0));
        assert_eq!(rot.get(0, 2, 0), img.get(2, 1, 0));
    }

    #[test]
    fn opposite_rotations_cancel() {
        let img = ramp(4, 3);
        assert_eq!(img.rotate90_cw().rotate90_ccw(), img);
        assert_eq!(img.rotate180().rotate180(), img);
    }

    #[test]
    fn from_raw_rejects_length_mismatch() {
        assert!(ImageBufU8::from_raw(2, 2, 3, vec![0; 11]).is_none());
    }

    #[test]
    fn pixel_access_through_view_traits() {
        let mut img = ImageBufU8::new(2, 2, 3, 0);
        img.pixel_mut(1, 1).copy_from_slice(&[1, 2, 3]);
        assert_eq!(img.pixel(1, 1), &[1, 2, 3]);
        assert_eq!(img.as_view().get(1, 1, 2), 3);
        assert_eq!(img.rows().count(), 2);
    }
}
