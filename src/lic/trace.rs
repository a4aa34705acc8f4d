use super::LicParams;
use crate::angle::align_axis;
use crate::image::{PixelBuffer, Sampler};

/// Upper bound on the samples taken by each half of a path.
pub const MAX_STEPS_PER_HALF: usize = 1 << 16;

/// Integrate `image` along the streamline of `field` through pixel `(x, y)`.
///
/// With `W0 = field(x, y)` the Gaussian variance is `fsigma2 = 2·dt·|W0|²`
/// and the path length `gaussian_precision·√fsigma2`. The forward half
/// starts on the pixel itself; the backward half starts one step behind it,
/// so the centre sample is counted once. Each half stops when it runs out of
/// length, leaves `[0, w-1] × [0, h-1]` or takes [`MAX_STEPS_PER_HALF`]
/// samples. Directions sampled along the way are sign-aligned with the
/// previous step.
///
/// Weighted samples are added to `acc` (one slot per channel) and the total
/// weight is returned. A zero return means nothing was accumulated.
/// `sample` is per-thread scratch of `image.channels` floats.
#[allow(clippy::too_many_arguments)]
pub fn trace_pixel<S: Sampler + ?Sized>(
    sampler: &S,
    image: &PixelBuffer,
    field: &PixelBuffer,
    x: usize,
    y: usize,
    params: &LicParams,
    acc: &mut [f32],
    sample: &mut [f32],
) -> f32 {
    let w0 = [field.at(x, y, 0), field.at(x, y, 1)];
    let fsigma2 = 2.0 * params.time_step * (w0[0] * w0[0] + w0[1] * w0[1]);
    if !(fsigma2.is_finite() && fsigma2 > 0.0) {
        return 0.0;
    }
    let length = params.gaussian_precision * fsigma2.sqrt();
    let dl = params.step_length;
    let (max_x, max_y) = ((image.w - 1) as f32, (image.h - 1) as f32);
    let inside = |p: [f32; 2]| p[0] >= 0.0 && p[1] >= 0.0 && p[0] <= max_x && p[1] <= max_y;

    let mut weight = 0.0f32;
    let mut accumulate = |p: [f32; 2], l: f32, sample: &mut [f32]| {
        let coef = (-l * l / fsigma2).exp();
        sampler.sample_into(image, p[0], p[1], sample);
        for (a, s) in acc.iter_mut().zip(sample.iter()) {
            *a += coef * s;
        }
        weight += coef;
    };

    // arc length is k·dl; accumulating `l += dl` stalls once dl < ulp(l) / 2
    let max_steps = ((length / dl).ceil() as usize).min(MAX_STEPS_PER_HALF);

    // forward
    let (mut p, mut dir) = ([x as f32, y as f32], w0);
    for k in 0..max_steps {
        let l = k as f32 * dl;
        if l >= length || !inside(p) {
            break;
        }
        let v = align_axis(dir, sampler.sample_vec2(field, p[0], p[1]));
        accumulate(p, l, sample);
        p = [p[0] + dl * v[0], p[1] + dl * v[1]];
        dir = v;
    }

    // backward
    let (mut p, mut dir) = ([x as f32 - dl * w0[0], y as f32 - dl * w0[1]], w0);
    for k in 1..=max_steps {
        let l = k as f32 * dl;
        if l >= length || !inside(p) {
            break;
        }
        let v = align_axis(dir, sampler.sample_vec2(field, p[0], p[1]));
        accumulate(p, l, sample);
        p = [p[0] - dl * v[0], p[1] - dl * v[1]];
        dir = v;
    }

    weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Bilinear;

    fn params(time_step: f32, step_length: f32) -> LicParams {
        LicParams {
            time_step,
            step_length,
            gaussian_precision: 2.0,
        }
    }

    fn uniform_field(w: usize, h: usize, v: [f32; 2]) -> PixelBuffer {
        let mut field = PixelBuffer::new(w, h, 2);
        for px in field.data.chunks_exact_mut(2) {
            px.copy_from_slice(&v);
        }
        field
    }

    #[test]
    fn zero_field_contributes_nothing() {
        let image = PixelBuffer::filled(5, 5, 1, 7.0);
        let field = PixelBuffer::new(5, 5, 2);
        let mut acc = [0.0f32];
        let mut sample = [0.0f32];
        let weight = trace_pixel(&Bilinear, &image, &field, 2, 2, &params(60.0, 0.8), &mut acc, &mut sample);
        assert_eq!(weight, 0.0);
        assert_eq!(acc, [0.0]);
    }

    #[test]
    fn zero_time_step_contributes_nothing() {
        let image = PixelBuffer::filled(5, 5, 1, 7.0);
        let field = uniform_field(5, 5, [1.0, 0.0]);
        let mut acc = [0.0f32];
        let mut sample = [0.0f32];
        let weight = trace_pixel(&Bilinear, &image, &field, 2, 2, &params(0.0, 0.8), &mut acc, &mut sample);
        assert_eq!(weight, 0.0);
    }

    #[test]
    fn constant_image_averages_to_itself() {
        let image = PixelBuffer::filled(9, 9, 2, 3.5);
        let field = uniform_field(9, 9, [0.6, 0.8]);
        let mut acc = [0.0f32; 2];
        let mut sample = [0.0f32; 2];
        let weight = trace_pixel(&Bilinear, &image, &field, 4, 4, &params(2.0, 0.5), &mut acc, &mut sample);
        assert!(weight > 1.0);
        assert!((acc[0] / weight - 3.5).abs() < 1e-5);
        assert!((acc[1] / weight - 3.5).abs() < 1e-5);
    }

    #[test]
    fn horizontal_field_ignores_other_rows() {
        // rows carry different values; a horizontal streamline stays on its row
        let mut image = PixelBuffer::new(7, 3, 1);
        for x in 0..7 {
            image.set(x, 0, 0, 100.0);
            image.set(x, 1, 0, 10.0);
            image.set(x, 2, 0, 100.0);
        }
        let field = uniform_field(7, 3, [1.0, 0.0]);
        let mut acc = [0.0f32];
        let mut sample = [0.0f32];
        let weight = trace_pixel(&Bilinear, &image, &field, 3, 1, &params(1.0, 0.5), &mut acc, &mut sample);
        assert!((acc[0] / weight - 10.0).abs() < 1e-5);
    }

    #[test]
    fn path_stops_at_the_border() {
        // one-pixel-wide image: every step along x leaves the domain
        let image = PixelBuffer::filled(1, 1, 1, 4.0);
        let field = uniform_field(1, 1, [1.0, 0.0]);
        let mut acc = [0.0f32];
        let mut sample = [0.0f32];
        let weight = trace_pixel(&Bilinear, &image, &field, 0, 0, &params(10.0, 0.5), &mut acc, &mut sample);
        // only the centre sample at l = 0
        assert_eq!(weight, 1.0);
        assert_eq!(acc, [4.0]);
    }

    #[test]
    fn tiny_step_length_terminates() {
        // 1e-7 is below half an ulp of the arc length reached along the way
        let image = PixelBuffer::filled(64, 64, 1, 9.0);
        let field = uniform_field(64, 64, [1.0, 0.0]);
        let mut acc = [0.0f32];
        let mut sample = [0.0f32];
        let weight = trace_pixel(&Bilinear, &image, &field, 32, 32, &params(60.0, 1e-7), &mut acc, &mut sample);
        assert!(weight.is_finite() && weight > 0.0);
        assert!(weight <= (2 * MAX_STEPS_PER_HALF) as f32);
        assert!((acc[0] / weight - 9.0).abs() < 1e-2);
    }
}
