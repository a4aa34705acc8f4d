use crate::image::{ImageView, ImageViewMut, PixelBuffer};

/// Kernel radius in units of sigma.
const RADIUS_SIGMAS: f32 = 3.0;

/// Trait implemented by separable 1D filters.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order). The kernel is assumed to be
    /// symmetric around its centre, but the implementation does not rely on it.
    fn taps(&self) -> &[f32];

    /// True when filtering leaves the input unchanged.
    fn is_identity(&self) -> bool {
        self.taps().len() <= 1
    }
}

/// Sampled, normalised Gaussian `exp(-k² / 2σ²)` truncated at `3σ`.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    sigma: f32,
    taps: Vec<f32>,
}

impl GaussianKernel {
    /// Build the kernel for `sigma`. Non-positive or non-finite sigmas yield
    /// the identity kernel `[1]`.
    pub fn new(sigma: f32) -> Self {
        if sigma.is_nan() || sigma <= 0.0 || sigma.is_infinite() {
            return Self {
                sigma: 0.0,
                taps: vec![1.0],
            };
        }
        let radius = (RADIUS_SIGMAS * sigma).ceil() as usize;
        let denom = 2.0 * sigma * sigma;
        let mut taps: Vec<f32> = (0..=2 * radius)
            .map(|i| {
                let k = i as f32 - radius as f32;
                (-k * k / denom).exp()
            })
            .collect();
        let sum: f32 = taps.iter().sum();
        for t in &mut taps {
            *t /= sum;
        }
        Self { sigma, taps }
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    pub fn radius(&self) -> usize {
        self.taps.len() / 2
    }
}

impl SeparableFilter for GaussianKernel {
    #[inline]
    fn taps(&self) -> &[f32] {
        &self.taps
    }
}

/// Filter `src` along X then Y, returning a new buffer of the same shape.
pub fn apply(filter: &dyn SeparableFilter, src: &PixelBuffer) -> PixelBuffer {
    if src.is_empty() || filter.is_identity() {
        return src.clone();
    }
    let taps = filter.taps();
    let radius = taps.len() / 2;
    let ch = src.channels;

    let mut horiz = src.zeros_like();
    for (y, row) in src.rows().enumerate() {
        filter_row(row, horiz.row_mut(y), ch, taps, radius);
    }

    let mut out = src.zeros_like();
    let mut column = vec![0.0f32; src.h];
    let mut filtered = vec![0.0f32; src.h];
    for x in 0..src.w {
        for c in 0..ch {
            for (y, v) in column.iter_mut().enumerate() {
                *v = horiz.at(x, y, c);
            }
            filter_row(&column, &mut filtered, 1, taps, radius);
            for (y, &v) in filtered.iter().enumerate() {
                out.set(x, y, c, v);
            }
        }
    }
    out
}

/// Convolve an interleaved row with `taps`, clamping indices at the ends.
fn filter_row(row: &[f32], out: &mut [f32], channels: usize, taps: &[f32], radius: usize) {
    let n = row.len() / channels;
    if n == 0 {
        return;
    }
    for x in 0..n {
        for c in 0..channels {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let idx = clamp_index(x as isize + k as isize - radius as isize, n);
                acc += tap * row[idx * channels + c];
            }
            out[x * channels + c] = acc;
        }
    }
}

fn clamp_index(idx: isize, upper: usize) -> usize {
    if upper == 0 {
        return 0;
    }
    if idx < 0 {
        0
    } else if (idx as usize) >= upper {
        upper - 1
    } else {
        idx as usize
    }
}
