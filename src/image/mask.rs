use super::buffer::PixelBuffer;

/// Owned 8-bit flag image. Non-zero entries are "set".
///
/// In inpainting a set pixel is a hole to be filled; in resizing it marks a
/// pixel that takes part in the diffusion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl Mask {
    /// Construct an all-clear mask.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h],
        }
    }

    /// Build a mask from raw flags. Returns `None` on a length mismatch.
    pub fn from_vec(w: usize, h: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == w * h).then_some(Self { w, h, data })
    }

    /// Threshold channel 0 of `buf`: samples strictly above `threshold` are set.
    pub fn from_buffer(buf: &PixelBuffer, threshold: f32) -> Self {
        let mut mask = Self::new(buf.w, buf.h);
        if buf.channels == 0 {
            return mask;
        }
        for (flag, px) in mask.data.iter_mut().zip(buf.data.chunks_exact(buf.channels)) {
            *flag = u8::from(px[0] > threshold);
        }
        mask
    }

    #[inline]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x] != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.data[y * self.w + x] = u8::from(on);
    }

    /// Row `y` of flags.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.w..(y + 1) * self.w]
    }

    /// Number of set pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    pub fn invert(&mut self) {
        for v in &mut self.data {
            *v = u8::from(*v == 0);
        }
    }

    /// Grow the set region by `radius` pixels using a square structuring
    /// element (Chebyshev distance). Separable: max along rows, then columns.
    pub fn dilate(&mut self, radius: usize) {
        if radius == 0 || self.data.is_empty() {
            return;
        }
        let (w, h) = (self.w, self.h);
        let mut tmp = vec![0u8; w * h];
        for y in 0..h {
            let src = &self.data[y * w..(y + 1) * w];
            let dst = &mut tmp[y * w..(y + 1) * w];
            for (x, out) in dst.iter_mut().enumerate() {
                let lo = x.saturating_sub(radius);
                let hi = (x + radius).min(w - 1);
                *out = u8::from(src[lo..=hi].iter().any(|&v| v != 0));
            }
        }
        for x in 0..w {
            for y in 0..h {
                let lo = y.saturating_sub(radius);
                let hi = (y + radius).min(h - 1);
                let on = (lo..=hi).any(|yy| tmp[yy * w + x] != 0);
                self.data[y * w + x] = u8::from(on);
            }
        }
    }

    /// True when `(x, y)` or one of its 4-neighbours (clamped) is set.
    #[inline]
    pub fn touches(&self, x: usize, y: usize) -> bool {
        let xm = x.saturating_sub(1);
        let xp = (x + 1).min(self.w - 1);
        let ym = y.saturating_sub(1);
        let yp = (y + 1).min(self.h - 1);
        self.is_set(x, y)
            || self.is_set(xm, y)
            || self.is_set(xp, y)
            || self.is_set(x, ym)
            || self.is_set(x, yp)
    }
}
