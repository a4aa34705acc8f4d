//! Oriented line integral convolution along a diffusion tensor field.
//!
//! For one sweep angle θ the diffusion tensor field is projected onto
//! `(cos θ, sin θ)`, giving a vector field `W` ([`project_field`]). Every
//! pixel then integrates the image along the streamline of `W` passing
//! through it, forward and backward, with a Gaussian weight in arc length
//! ([`trace_pixel`]). [`sweep`] runs that for all (unmasked) pixels,
//! accumulating into `dest` and the weight sums into `sum`.
//!
//! Pixels are independent within a sweep: each one reads the shared
//! `image`/`W` buffers and writes only its own `dest`/`sum` slots, which
//! is what the row-parallel path relies on.

pub mod field;
pub mod sweep;
pub mod trace;

pub use field::project_field;
pub use sweep::{sweep, SweepInputs};
pub use trace::trace_pixel;

/// Integration parameters shared by every pixel of a sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LicParams {
    /// Diffusion time `dt`; the Gaussian variance is `2·dt·|W|²`.
    pub time_step: f32,
    /// Arc-length increment `dl` between samples.
    pub step_length: f32,
    /// Cutoff radius in standard deviations.
    pub gaussian_precision: f32,
}
