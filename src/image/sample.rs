//! Sub-pixel sampling strategies used by the line integrator.
//!
//! Both samplers clamp coordinates to `[0, w-1] × [0, h-1]`, so they never
//! read outside the buffer regardless of the position they are handed.
use super::buffer::{round_coord, split_coord, PixelBuffer};
use serde::{Deserialize, Serialize};

/// Reads all channels of a buffer at a floating-point position.
pub trait Sampler: Sync {
    /// Write the `buf.channels` samples at `(x, y)` into `out`.
    fn sample_into(&self, buf: &PixelBuffer, x: f32, y: f32, out: &mut [f32]);

    /// Sample a 2-channel vector field at `(x, y)`.
    #[inline]
    fn sample_vec2(&self, field: &PixelBuffer, x: f32, y: f32) -> [f32; 2] {
        let mut out = [0.0f32; 2];
        self.sample_into(field, x, y, &mut out);
        out
    }
}

/// Bilinear blend of the four clamped neighbours.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bilinear;

/// Nearest clamped pixel (faster, blockier).
#[derive(Clone, Copy, Debug, Default)]
pub struct Nearest;

impl Sampler for Bilinear {
    #[inline]
    fn sample_into(&self, buf: &PixelBuffer, x: f32, y: f32, out: &mut [f32]) {
        if buf.is_empty() {
            out.fill(0.0);
            return;
        }
        let (x0, x1, tx) = split_coord(x, buf.w);
        let (y0, y1, ty) = split_coord(y, buf.h);
        let p00 = buf.pixel(x0, y0);
        let p10 = buf.pixel(x1, y0);
        let p01 = buf.pixel(x0, y1);
        let p11 = buf.pixel(x1, y1);
        let (ix, iy) = (1.0 - tx, 1.0 - ty);
        for (c, dst) in out.iter_mut().enumerate().take(buf.channels) {
            let top = p00[c] * ix + p10[c] * tx;
            let bottom = p01[c] * ix + p11[c] * tx;
            *dst = top * iy + bottom * ty;
        }
    }
}

impl Sampler for Nearest {
    #[inline]
    fn sample_into(&self, buf: &PixelBuffer, x: f32, y: f32, out: &mut [f32]) {
        if buf.is_empty() {
            out.fill(0.0);
            return;
        }
        let px = buf.pixel(round_coord(x, buf.w), round_coord(y, buf.h));
        let n = out.len().min(px.len());
        out[..n].copy_from_slice(&px[..n]);
    }
}

/// Interpolation scheme selected by configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    Nearest,
    #[default]
    Linear,
}
