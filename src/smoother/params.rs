//! Numeric parameters of the smoother.
//!
//! Defaults follow the classic restoration settings: one iteration with a
//! large time step, light tensor blur, sub-pixel integration steps and a 30°
//! angle sweep. Start tuning with `time_step` (strength) and the two
//! limiter exponents (edge preservation).

use crate::error::{invalid, Result};
use crate::image::Interpolation;
use crate::lic::LicParams;
use crate::tensor::DiffusionLimiter;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingParams {
    /// Number of smoothing passes (>= 1).
    pub iterations: usize,
    /// Diffusion time `dt` per pass (>= 0). Zero leaves the image unchanged.
    pub time_step: f32,
    /// Standard deviation of the structure tensor blur (>= 0).
    pub tensor_sigma: f32,
    /// Integration step length `dl` in pixels (> 0).
    pub step_length: f32,
    /// Angular sweep step in degrees, in `(0, 180]`.
    pub angle_step_deg: f32,
    /// Isophote limiter exponent `p1`.
    pub isophote_limiter: f32,
    /// Gradient limiter exponent `p2`; must not be smaller than `p1`.
    pub gradient_limiter: f32,
    /// Integration cutoff in standard deviations (> 0).
    pub gaussian_precision: f32,
    /// Rescale the final image to `[0, 255]`.
    pub normalize_output: bool,
    /// Sampling used along integration paths.
    pub interpolation: Interpolation,
    /// Seed of the noise initial fill for inpainting.
    pub noise_seed: u64,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            iterations: 1,
            time_step: 60.0,
            tensor_sigma: 1.1,
            step_length: 0.8,
            angle_step_deg: 30.0,
            isophote_limiter: 0.5,
            gradient_limiter: 0.9,
            gaussian_precision: 2.0,
            normalize_output: false,
            interpolation: Interpolation::Linear,
            noise_seed: 0,
        }
    }
}

impl SmoothingParams {
    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(invalid("iterations must be at least 1"));
        }
        if !(self.time_step.is_finite() && self.time_step >= 0.0) {
            return Err(invalid(format!(
                "time_step must be finite and >= 0 (got {})",
                self.time_step
            )));
        }
        if !(self.tensor_sigma.is_finite() && self.tensor_sigma >= 0.0) {
            return Err(invalid(format!(
                "tensor_sigma must be finite and >= 0 (got {})",
                self.tensor_sigma
            )));
        }
        if !(self.step_length.is_finite() && self.step_length > 0.0) {
            return Err(invalid(format!(
                "step_length must be finite and > 0 (got {})",
                self.step_length
            )));
        }
        if !(self.angle_step_deg > 0.0 && self.angle_step_deg <= 180.0) {
            return Err(invalid(format!(
                "angle_step_deg must lie in (0, 180] (got {})",
                self.angle_step_deg
            )));
        }
        if !(self.gaussian_precision.is_finite() && self.gaussian_precision > 0.0) {
            return Err(invalid(format!(
                "gaussian_precision must be finite and > 0 (got {})",
                self.gaussian_precision
            )));
        }
        if !(self.isophote_limiter.is_finite() && self.gradient_limiter.is_finite()) {
            return Err(invalid("diffusion limiters must be finite"));
        }
        if self.gradient_limiter < self.isophote_limiter {
            return Err(invalid(format!(
                "gradient_limiter ({}) must be >= isophote_limiter ({})",
                self.gradient_limiter, self.isophote_limiter
            )));
        }
        Ok(())
    }

    pub fn limiter(&self) -> DiffusionLimiter {
        DiffusionLimiter {
            p1: self.isophote_limiter,
            p2: self.gradient_limiter,
        }
    }

    pub fn lic(&self) -> LicParams {
        LicParams {
            time_step: self.time_step,
            step_length: self.step_length,
            gaussian_precision: self.gaussian_precision,
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_time_step(mut self, time_step: f32) -> Self {
        self.time_step = time_step;
        self
    }

    pub fn with_tensor_sigma(mut self, sigma: f32) -> Self {
        self.tensor_sigma = sigma;
        self
    }

    pub fn with_step_length(mut self, step_length: f32) -> Self {
        self.step_length = step_length;
        self
    }

    pub fn with_angle_step(mut self, degrees: f32) -> Self {
        self.angle_step_deg = degrees;
        self
    }

    pub fn with_limiters(mut self, isophote: f32, gradient: f32) -> Self {
        self.isophote_limiter = isophote;
        self.gradient_limiter = gradient;
        self
    }

    pub fn with_gaussian_precision(mut self, precision: f32) -> Self {
        self.gaussian_precision = precision;
        self
    }

    pub fn with_normalize_output(mut self, normalize: bool) -> Self {
        self.normalize_output = normalize;
        self
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SmoothError;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SmoothingParams::default().validate(), Ok(()));
    }

    #[test]
    fn limiter_order_is_enforced() {
        let err = SmoothingParams::default()
            .with_limiters(0.9, 0.5)
            .validate()
            .unwrap_err();
        assert!(matches!(err, SmoothError::InvalidConfiguration(ref m) if m.contains("gradient_limiter")));
        assert!(SmoothingParams::default().with_limiters(0.7, 0.7).validate().is_ok());
    }

    #[test]
    fn out_of_range_fields_are_rejected() {
        let base = SmoothingParams::default();
        for bad in [
            base.clone().with_iterations(0),
            base.clone().with_time_step(-1.0),
            base.clone().with_time_step(f32::NAN),
            base.clone().with_tensor_sigma(-0.5),
            base.clone().with_step_length(0.0),
            base.clone().with_angle_step(0.0),
            base.clone().with_angle_step(181.0),
            base.clone().with_angle_step(f32::NAN),
            base.clone().with_gaussian_precision(0.0),
            base.clone().with_limiters(f32::NAN, 1.0),
        ] {
            assert!(bad.validate().is_err(), "{bad:?}");
        }
        assert!(base.with_time_step(0.0).validate().is_ok());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let params: SmoothingParams =
            serde_json::from_str(r#"{ "iterations": 3, "interpolation": "nearest" }"#).unwrap();
        assert_eq!(params.iterations, 3);
        assert_eq!(params.interpolation, Interpolation::Nearest);
        assert_eq!(params.time_step, 60.0);
    }
}
