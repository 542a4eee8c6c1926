/// Borrowed view over an interleaved 8-bit camera buffer.
///
/// `stride` counts bytes between rows, so padded sensor buffers can be wrapped
/// without copying. `channels` is 1 (gray), 3 (RGB) or 4 (RGBA/BGRA).
#[derive(Clone, Copy, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize,
    pub channels: usize,
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// Wrap a tightly packed buffer. Returns `None` when `data` is too short.
    pub fn packed(w: usize, h: usize, channels: usize, data: &'a [u8]) -> Option<Self> {
        (data.len() >= w * h * channels && channels > 0).then_some(Self {
            w,
            h,
            stride: w * channels,
            channels,
            data,
        })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> u8 {
        self.data[y * self.stride + x * self.channels + c]
    }
}

impl<'a> crate::image::traits::ImageView for ImageU8<'a> {
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
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w * self.channels]
    }
}
