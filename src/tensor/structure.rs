//! Smoothed structure tensor field.
//!
//! For every channel, centred differences `ix = ½(I(x+1,y) − I(x−1,y))` and
//! `iy = ½(I(x,y+1) − I(x,y−1))` (replicate border) are accumulated as
//! `a += ix², b += ix·iy, c += iy²`. The raw field is then Gaussian-blurred
//! with standard deviation `sigma`.
use super::{Tensor3, TensorField};
use crate::blur::{apply as apply_filter, GaussianKernel};
use crate::image::{Mask, PixelBuffer};

/// Compute the smoothed structure tensor of `image`.
///
/// When `exclude` is given, pixels whose difference stencil touches a set
/// mask pixel contribute nothing; the blur then propagates the orientation
/// of the surrounding known pixels into the excluded region.
pub fn structure_tensor(image: &PixelBuffer, sigma: f32, exclude: Option<&Mask>) -> TensorField {
    let raw = raw_structure_tensor(image, exclude);
    if raw.as_buffer().is_empty() {
        return raw;
    }
    let blurred = apply_filter(&GaussianKernel::new(sigma), raw.as_buffer());
    TensorField::from_buffer(blurred).unwrap_or(raw)
}

/// Unsmoothed gradient outer products summed over channels.
pub fn raw_structure_tensor(image: &PixelBuffer, exclude: Option<&Mask>) -> TensorField {
    let (w, h) = (image.w, image.h);
    let mut field = TensorField::new(w, h);
    if image.is_empty() {
        return field;
    }
    for y in 0..h {
        let yi = y as isize;
        for x in 0..w {
            if exclude.is_some_and(|m| m.touches(x, y)) {
                continue;
            }
            let xi = x as isize;
            let mut t = Tensor3::ZERO;
            for c in 0..image.channels {
                let ix = 0.5 * (image.clamped_at(xi + 1, yi, c) - image.clamped_at(xi - 1, yi, c));
                let iy = 0.5 * (image.clamped_at(xi, yi + 1, c) - image.clamped_at(xi, yi - 1, c));
                t.a += ix * ix;
                t.b += ix * iy;
                t.c += iy * iy;
            }
            field.set(x, y, t);
        }
    }
    field
}
