//! Owned multi-channel f32 image in row-major, channel-interleaved layout.
//!
//! Sample `(x, y, c)` lives at `(y * w + x) * channels + c`. Zero-area
//! buffers are valid; every operation on them is a no-op.
use super::traits::{ImageView, ImageViewMut};

#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Samples per pixel
    pub channels: usize,
    /// Backing storage, `w * h * channels` values
    pub data: Vec<f32>,
}

impl PixelBuffer {
    /// Construct a zero-initialized buffer of size `w × h × channels`.
    pub fn new(w: usize, h: usize, channels: usize) -> Self {
        Self::filled(w, h, channels, 0.0)
    }

    /// Construct a buffer with every sample set to `value`.
    pub fn filled(w: usize, h: usize, channels: usize, value: f32) -> Self {
        Self {
            w,
            h,
            channels,
            data: vec![value; w * h * channels],
        }
    }

    /// Wrap existing interleaved samples. Returns `None` when the length does
    /// not match the geometry.
    pub fn from_vec(w: usize, h: usize, channels: usize, data: Vec<f32>) -> Option<Self> {
        (data.len() == w * h * channels).then_some(Self {
            w,
            h,
            channels,
            data,
        })
    }

    /// A buffer with the same geometry, filled with zeros.
    pub fn zeros_like(&self) -> Self {
        Self::new(self.w, self.h, self.channels)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.w * self.h
    }

    #[inline]
    /// Linear index of sample `(x, y, c)`.
    pub fn idx(&self, x: usize, y: usize, c: usize) -> usize {
        (y * self.w + x) * self.channels + c
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize, c: usize) -> f32 {
        self.data[self.idx(x, y, c)]
    }

    #[inline]
    pub fn at_mut(&mut self, x: usize, y: usize, c: usize) -> &mut f32 {
        let i = self.idx(x, y, c);
        &mut self.data[i]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, c: usize, v: f32) {
        let i = self.idx(x, y, c);
        self.data[i] = v;
    }

    /// All channels of pixel `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[f32] {
        let start = self.idx(x, y, 0);
        &self.data[start..start + self.channels]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [f32] {
        let start = self.idx(x, y, 0);
        let end = start + self.channels;
        &mut self.data[start..end]
    }

    /// Sample at integer coordinates with replicate boundary.
    #[inline]
    pub fn clamped_at(&self, x: isize, y: isize, c: usize) -> f32 {
        let cx = x.clamp(0, self.w as isize - 1) as usize;
        let cy = y.clamp(0, self.h as isize - 1) as usize;
        self.at(cx, cy, c)
    }

    /// Bilinear sample at `(x, y)`; coordinates clamp to the image extents.
    pub fn bilinear(&self, x: f32, y: f32, c: usize) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let (x0, x1, tx) = split_coord(x, self.w);
        let (y0, y1, ty) = split_coord(y, self.h);
        let top = self.at(x0, y0, c) * (1.0 - tx) + self.at(x1, y0, c) * tx;
        let bottom = self.at(x0, y1, c) * (1.0 - tx) + self.at(x1, y1, c) * tx;
        top * (1.0 - ty) + bottom * ty
    }

    /// Nearest-pixel sample at `(x, y)`; coordinates clamp to the image extents.
    pub fn nearest(&self, x: f32, y: f32, c: usize) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        self.at(round_coord(x, self.w), round_coord(y, self.h), c)
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Smallest and largest sample, `None` for an empty buffer.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut iter = self.data.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Affine rescale of all samples from the observed range into
    /// `[new_min, new_max]`. A constant image maps to `new_min`.
    pub fn normalize_range(&mut self, new_min: f32, new_max: f32) {
        let Some((lo, hi)) = self.min_max() else {
            return;
        };
        let span = hi - lo;
        if span <= 0.0 || !span.is_finite() {
            self.data.fill(new_min);
            return;
        }
        let scale = (new_max - new_min) / span;
        for v in &mut self.data {
            *v = (*v - lo) * scale + new_min;
        }
    }

    /// Per-pixel Euclidean norm across channels as a 1-channel buffer.
    pub fn pointwise_norm(&self) -> PixelBuffer {
        let mut out = PixelBuffer::new(self.w, self.h, 1);
        if self.channels == 0 {
            return out;
        }
        for (dst, px) in out.data.iter_mut().zip(self.data.chunks_exact(self.channels)) {
            *dst = px.iter().map(|v| v * v).sum::<f32>().sqrt();
        }
        out
    }
}

/// Clamp `v` to `[0, n-1]` and split into the two neighbouring indices and
/// the interpolation fraction.
#[inline]
pub(crate) fn split_coord(v: f32, n: usize) -> (usize, usize, f32) {
    let max = (n - 1) as f32;
    let v = if v.is_finite() { v.clamp(0.0, max) } else { 0.0 };
    let f = v.floor();
    let i0 = f as usize;
    let i1 = (i0 + 1).min(n - 1);
    (i0, i1, v - f)
}

#[inline]
pub(crate) fn round_coord(v: f32, n: usize) -> usize {
    let max = (n - 1) as f32;
    let v = if v.is_finite() { v.clamp(0.0, max) } else { 0.0 };
    ((v + 0.5).floor() as usize).min(n - 1)
}

impl ImageView for PixelBuffer {
    type Pixel = f32;

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
    fn row(&self, y: usize) -> &[f32] {
        let len = self.w * self.channels;
        &self.data[y * len..(y + 1) * len]
    }
}

impl ImageViewMut for PixelBuffer {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let len = self.w * self.channels;
        &mut self.data[y * len..(y + 1) * len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: usize, h: usize) -> PixelBuffer {
        let data = (0..w * h).map(|i| i as f32).collect();
        PixelBuffer::from_vec(w, h, 1, data).expect("geometry matches")
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        assert!(PixelBuffer::from_vec(2, 2, 3, vec![0.0; 11]).is_none());
        assert!(PixelBuffer::from_vec(2, 2, 3, vec![0.0; 12]).is_some());
    }

    #[test]
    fn interleaved_indexing() {
        let mut img = PixelBuffer::new(3, 2, 3);
        img.set(2, 1, 1, 7.0);
        assert_eq!(img.data[(1 * 3 + 2) * 3 + 1], 7.0);
        assert_eq!(img.pixel(2, 1), &[0.0, 7.0, 0.0]);
        assert_eq!(img.row(1).len(), 9);
    }

    #[test]
    fn clamped_access_replicates_border() {
        let img = ramp(4, 3);
        assert_eq!(img.clamped_at(-5, 0, 0), img.at(0, 0, 0));
        assert_eq!(img.clamped_at(10, 10, 0), img.at(3, 2, 0));
    }

    #[test]
    fn bilinear_interpolates_and_clamps() {
        let img = ramp(4, 3);
        assert!((img.bilinear(1.5, 0.0, 0) - 1.5).abs() < 1e-6);
        assert!((img.bilinear(0.0, 0.5, 0) - 2.0).abs() < 1e-6);
        assert_eq!(img.bilinear(-3.0, -3.0, 0), 0.0);
        assert_eq!(img.bilinear(100.0, 100.0, 0), 11.0);
        assert_eq!(img.bilinear(2.0, 1.0, 0), img.at(2, 1, 0));
    }

    #[test]
    fn nearest_rounds_and_clamps() {
        let img = ramp(4, 3);
        assert_eq!(img.nearest(1.49, 0.0, 0), 1.0);
        assert_eq!(img.nearest(1.5, 0.0, 0), 2.0);
        assert_eq!(img.nearest(9.0, -2.0, 0), 3.0);
        assert_eq!(img.nearest(f32::NAN, 0.0, 0), 0.0);
    }

    #[test]
    fn normalize_range_maps_observed_extrema() {
        let mut img = ramp(3, 1);
        img.normalize_range(0.0, 255.0);
        assert_eq!(img.data, vec![0.0, 127.5, 255.0]);

        let mut flat = PixelBuffer::filled(2, 2, 1, 3.0);
        flat.normalize_range(10.0, 20.0);
        assert!(flat.data.iter().all(|&v| v == 10.0));
    }

    #[test]
    fn empty_buffer_is_inert() {
        let mut img = PixelBuffer::new(0, 5, 3);
        assert!(img.is_empty());
        assert!(img.min_max().is_none());
        img.normalize_range(0.0, 1.0);
        img.fill(4.0);
        assert_eq!(img.bilinear(1.0, 1.0, 0), 0.0);
        assert_eq!(img.nearest(1.0, 1.0, 0), 0.0);
    }

    #[test]
    fn pointwise_norm_combines_channels() {
        let img = PixelBuffer::from_vec(1, 1, 2, vec![3.0, 4.0]).unwrap();
        assert_eq!(img.pointwise_norm().data, vec![5.0]);
    }
}
