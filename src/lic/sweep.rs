use super::{trace_pixel, LicParams};
use crate::image::{Mask, PixelBuffer, Sampler};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Read-only buffers shared by every pixel of one sweep.
#[derive(Clone, Copy, Debug)]
pub struct SweepInputs<'a> {
    /// Image being smoothed.
    pub image: &'a PixelBuffer,
    /// Projected 2-channel direction field for this angle.
    pub field: &'a PixelBuffer,
    /// When present, only set pixels are integrated.
    pub active: Option<&'a Mask>,
}

/// Run [`trace_pixel`] for every active pixel, adding into `dest`
/// (same shape as the image) and `sum` (one channel).
///
/// Returns how many pixels received a non-zero weight.
pub fn sweep<S: Sampler + ?Sized>(
    sampler: &S,
    inputs: SweepInputs<'_>,
    params: &LicParams,
    dest: &mut PixelBuffer,
    sum: &mut PixelBuffer,
) -> usize {
    let image = inputs.image;
    if image.is_empty() {
        return 0;
    }
    let (w, ch) = (image.w, image.channels);
    debug_assert_eq!(dest.data.len(), image.data.len());
    debug_assert_eq!(sum.data.len(), w * image.h);

    let sweep_row = |y: usize, dest_row: &mut [f32], sum_row: &mut [f32]| -> usize {
        let mut sample = vec![0.0f32; ch];
        let mut reached = 0usize;
        for x in 0..w {
            if inputs.active.is_some_and(|m| !m.is_set(x, y)) {
                continue;
            }
            let acc = &mut dest_row[x * ch..(x + 1) * ch];
            let weight = trace_pixel(sampler, image, inputs.field, x, y, params, acc, &mut sample);
            if weight > 0.0 {
                sum_row[x] += weight;
                reached += 1;
            }
        }
        reached
    };

    #[cfg(feature = "parallel")]
    let reached: usize = dest
        .data
        .par_chunks_mut(w * ch)
        .zip(sum.data.par_chunks_mut(w))
        .enumerate()
        .map(|(y, (dest_row, sum_row))| sweep_row(y, dest_row, sum_row))
        .sum();

    #[cfg(not(feature = "parallel"))]
    let reached: usize = dest
        .data
        .chunks_mut(w * ch)
        .zip(sum.data.chunks_mut(w))
        .enumerate()
        .map(|(y, (dest_row, sum_row))| sweep_row(y, dest_row, sum_row))
        .sum();

    reached
}
