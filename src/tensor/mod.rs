//! Per-pixel symmetric 2x2 tensors.
//!
//! - [`Tensor3`]: `[[a, b], [b, c]]` stored as three floats.
//! - [`EigenPair`]: closed-form eigen-decomposition, computed on demand.
//! - [`TensorField`]: one tensor per pixel (3-channel [`PixelBuffer`]).
//! - [`structure`]: smoothed gradient outer products.
//! - [`diffusion`]: edge-preserving diffusion tensors derived from them.

pub mod diffusion;
pub mod structure;

pub use diffusion::{diffusion_tensor, flow_tensor, DiffusionLimiter};
pub use structure::structure_tensor;

use crate::image::PixelBuffer;

/// Symmetric 2x2 matrix `[[a, b], [b, c]]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tensor3 {
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

/// Eigenvalues `l1 <= l2` with unit eigenvectors. `iso` pairs with `l1`
/// (isophote direction), `grad` with `l2` (gradient direction).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EigenPair {
    pub l1: f32,
    pub l2: f32,
    pub iso: [f32; 2],
    pub grad: [f32; 2],
}

impl Tensor3 {
    pub const ZERO: Tensor3 = Tensor3 {
        a: 0.0,
        b: 0.0,
        c: 0.0,
    };
    pub const IDENTITY: Tensor3 = Tensor3 {
        a: 1.0,
        b: 0.0,
        c: 1.0,
    };

    #[inline]
    pub fn new(a: f32, b: f32, c: f32) -> Self {
        Self { a, b, c }
    }

    /// `v ⊗ v`
    #[inline]
    pub fn outer(v: [f32; 2]) -> Self {
        Self::new(v[0] * v[0], v[0] * v[1], v[1] * v[1])
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite()
    }

    #[inline]
    pub fn trace(&self) -> f32 {
        self.a + self.c
    }

    /// Matrix-vector product `T · v`.
    #[inline]
    pub fn apply(&self, v: [f32; 2]) -> [f32; 2] {
        [self.a * v[0] + self.b * v[1], self.b * v[0] + self.c * v[1]]
    }

    /// Closed-form symmetric eigen-solve.
    pub fn eigen(&self) -> EigenPair {
        let half_sum = 0.5 * (self.a + self.c);
        let half_diff = 0.5 * (self.a - self.c);
        let disc = half_diff.hypot(self.b);
        let l1 = half_sum - disc;
        let l2 = half_sum + disc;

        // eigenvector of l2, picking the better conditioned of the two forms
        let (gx, gy) = if disc == 0.0 {
            (1.0, 0.0)
        } else if half_diff >= 0.0 {
            (half_diff + disc, self.b)
        } else {
            (self.b, disc - half_diff)
        };
        let norm = gx.hypot(gy);
        let grad = if norm > 0.0 {
            [gx / norm, gy / norm]
        } else {
            [1.0, 0.0]
        };
        EigenPair {
            l1,
            l2,
            iso: [-grad[1], grad[0]],
            grad,
        }
    }
}

impl std::ops::Add for Tensor3 {
    type Output = Tensor3;

    fn add(self, rhs: Tensor3) -> Tensor3 {
        Tensor3::new(self.a + rhs.a, self.b + rhs.b, self.c + rhs.c)
    }
}

impl std::ops::Mul<Tensor3> for f32 {
    type Output = Tensor3;

    fn mul(self, rhs: Tensor3) -> Tensor3 {
        Tensor3::new(self * rhs.a, self * rhs.b, self * rhs.c)
    }
}

/// One [`Tensor3`] per pixel, stored as a 3-channel buffer `(a, b, c)`.
#[derive(Clone, Debug, PartialEq)]
pub struct TensorField {
    buf: PixelBuffer,
}

impl TensorField {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            buf: PixelBuffer::new(w, h, 3),
        }
    }

    /// Wrap a 3-channel buffer. Returns `None` for any other channel count.
    pub fn from_buffer(buf: PixelBuffer) -> Option<Self> {
        (buf.channels == 3).then_some(Self { buf })
    }

    #[inline]
    pub fn w(&self) -> usize {
        self.buf.w
    }

    #[inline]
    pub fn h(&self) -> usize {
        self.buf.h
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Tensor3 {
        let px = self.buf.pixel(x, y);
        Tensor3::new(px[0], px[1], px[2])
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, t: Tensor3) {
        let px = self.buf.pixel_mut(x, y);
        px[0] = t.a;
        px[1] = t.b;
        px[2] = t.c;
    }

    pub fn as_buffer(&self) -> &PixelBuffer {
        &self.buf
    }

    /// Resize storage to `w × h`, zeroing it.
    pub fn reset(&mut self, w: usize, h: usize) {
        self.buf.w = w;
        self.buf.h = h;
        self.buf.data.clear();
        self.buf.data.resize(w * h * 3, 0.0);
    }

    /// Divide every component by the largest absolute component so the field
    /// lies in `[-1, 1]`. Returns the divisor, or `None` when the field is
    /// all-zero (or not finite) and was left untouched.
    pub fn normalize_max_abs(&mut self) -> Option<f32> {
        let (lo, hi) = self.buf.min_max()?;
        let scale = hi.abs().max(lo.abs());
        if scale <= 0.0 || !scale.is_finite() {
            return None;
        }
        for v in &mut self.buf.data {
            *v /= scale;
        }
        Some(scale)
    }
}
