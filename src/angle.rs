//! Angle utilities for the orientation sweep.
//!
//! Diffusion tensor principal directions are axes, not oriented vectors, so
//! the sweep only needs to cover `[0°, 180°)`.

/// One discretised sweep direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepAngle {
    pub degrees: f32,
    pub cos: f32,
    pub sin: f32,
}

impl SweepAngle {
    pub fn from_degrees(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self { degrees, cos, sin }
    }

    #[inline]
    pub fn direction(&self) -> [f32; 2] {
        [self.cos, self.sin]
    }
}

/// Iterator over `start, start + step, … < 180` with
/// `start = (180 mod step) / 2`, which centres the sweep in the half circle.
#[derive(Clone, Debug)]
pub struct AngleSweep {
    step: f64,
    start: f64,
    index: usize,
}

impl AngleSweep {
    /// `step_deg` must lie in `(0, 180]`; this is validated by the caller.
    pub fn new(step_deg: f32) -> Self {
        let step = f64::from(step_deg);
        Self {
            step,
            start: 0.5 * (180.0 % step),
            index: 0,
        }
    }

    /// Number of angles the sweep yields.
    pub fn count_angles(step_deg: f32) -> usize {
        Self::new(step_deg).count()
    }
}

impl Iterator for AngleSweep {
    type Item = SweepAngle;

    fn next(&mut self) -> Option<SweepAngle> {
        if self.step.is_nan() || self.step <= 0.0 {
            return None;
        }
        // start + k·step from the index, so long sweeps do not drift
        let degrees = self.start + self.index as f64 * self.step;
        if degrees >= 180.0 {
            return None;
        }
        self.index += 1;
        Some(SweepAngle::from_degrees(degrees as f32))
    }
}

/// Flip `v` when it points against `prev`, keeping a path moving forward
/// through a sign-ambiguous axis field.
#[inline]
pub fn align_axis(prev: [f32; 2], v: [f32; 2]) -> [f32; 2] {
    if prev[0] * v[0] + prev[1] * v[1] < 0.0 {
        [-v[0], -v[1]]
    } else {
        v
    }
}
