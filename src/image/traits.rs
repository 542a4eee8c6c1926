/// Read access to an interleaved, row-major pixel buffer.
///
/// `row(y)` returns the `width * channels` samples of row `y`; `stride` is the
/// distance in samples between consecutive rows and may exceed the row length
/// for padded camera buffers.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn channels(&self) -> usize;
    fn stride(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }

    fn row_len(&self) -> usize {
        self.width() * self.channels()
    }

    fn is_contiguous(&self) -> bool {
        self.stride() == self.row_len()
    }

    fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Samples of the pixel at `(x, y)`, one per channel.
    fn pixel(&self, x: usize, y: usize) -> &[Self::Pixel] {
        let c = self.channels();
        &self.row(y)[x * c..(x + 1) * c]
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];

    fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [Self::Pixel] {
        let c = self.channels();
        &mut self.row_mut(y)[x * c..(x + 1) * c]
    }
}

pub struct Rows<'a, I: ?Sized + ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        let y = self.y;
        self.y += 1;
        Some(self.image.row(y))
    }
}
