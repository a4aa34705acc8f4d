//! Geometric resize for the resize operating mode.
//!
//! All modes share a corner-aligned mapping: destination column `x` reads
//! source column `x * (w - 1) / (nw - 1)`, so the first and last pixels of
//! both grids coincide. Under this mapping a destination pixel lands exactly
//! on a source pixel iff `x * (w - 1)` is divisible by `nw - 1`; those are the
//! anchor positions that [`ResizeMode::ZeroPad`] keeps.
use super::buffer::PixelBuffer;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMode {
    /// Nearest source pixel.
    Nearest,
    /// Bilinear blend of the four surrounding source pixels.
    #[default]
    Bilinear,
    /// Keep only samples that fall exactly on a source pixel, zero elsewhere.
    ZeroPad,
}

/// Integer description of where destination index `i` falls in the source.
#[derive(Clone, Copy, Debug)]
struct AxisMap {
    /// `i * (src - 1)`
    num: usize,
    /// `dst - 1` (never zero; a 1-pixel destination maps to source 0)
    den: usize,
}

impl AxisMap {
    #[inline]
    fn new(i: usize, src: usize, dst: usize) -> Self {
        if dst <= 1 {
            return Self { num: 0, den: 1 };
        }
        Self {
            num: i * (src - 1),
            den: dst - 1,
        }
    }

    #[inline]
    fn exact(&self) -> Option<usize> {
        (self.num % self.den == 0).then_some(self.num / self.den)
    }

    #[inline]
    fn rounded(&self) -> usize {
        (self.num + self.den / 2) / self.den
    }

    #[inline]
    fn coord(&self) -> f32 {
        self.num as f32 / self.den as f32
    }
}

impl PixelBuffer {
    /// Resize to `nw × nh` with the given mode. Channels are preserved; an
    /// empty source or target yields an empty (zero-filled) result.
    pub fn resize_to(&self, nw: usize, nh: usize, mode: ResizeMode) -> PixelBuffer {
        let mut out = PixelBuffer::new(nw, nh, self.channels);
        if self.is_empty() || out.is_empty() {
            return out;
        }
        let xs: Vec<AxisMap> = (0..nw).map(|x| AxisMap::new(x, self.w, nw)).collect();
        let ys: Vec<AxisMap> = (0..nh).map(|y| AxisMap::new(y, self.h, nh)).collect();
        let ch = self.channels;
        for (y, my) in ys.iter().enumerate() {
            for (x, mx) in xs.iter().enumerate() {
                let dst = out.pixel_mut(x, y);
                match mode {
                    ResizeMode::Nearest => {
                        dst.copy_from_slice(self.pixel(mx.rounded(), my.rounded()));
                    }
                    ResizeMode::Bilinear => {
                        let (sx, sy) = (mx.coord(), my.coord());
                        for (c, v) in dst.iter_mut().enumerate().take(ch) {
                            *v = self.bilinear(sx, sy, c);
                        }
                    }
                    ResizeMode::ZeroPad => {
                        if let (Some(sx), Some(sy)) = (mx.exact(), my.exact()) {
                            dst.copy_from_slice(self.pixel(sx, sy));
                        }
                    }
                }
            }
        }
        out
    }
}
