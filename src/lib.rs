#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod host;
pub mod image;
pub mod smoother;

// Numeric building blocks, public for tools and tests.
pub mod angle;
pub mod blur;
pub mod lic;
pub mod tensor;

// --- High-level re-exports -------------------------------------------------

pub use crate::diagnostics::SmoothingReport;
pub use crate::error::SmoothError;
pub use crate::image::{Mask, PixelBuffer};
pub use crate::smoother::{smooth, AnisotropicSmoother, InitFill, Mode, SmootherState, SmoothingParams};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use lic_smooth::prelude::*;
///
/// # fn main() -> Result<(), SmoothError> {
/// let mut hole = Mask::new(32, 32);
/// hole.set(16, 16, true);
/// let mode = Mode::Inpaint { mask: hole, init: InitFill::Interpolated, dilation: 2 };
///
/// let mut smoother = AnisotropicSmoother::new(SmoothingParams::default());
/// smoother.prepare(mode, PixelBuffer::filled(32, 32, 3, 200.0))?;
/// smoother.run()?;
/// let out = smoother.finish()?;
/// println!("{}x{}x{}", out.w, out.h, out.channels);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{Interpolation, Mask, PixelBuffer, ResizeMode};
    pub use crate::{smooth, AnisotropicSmoother, InitFill, Mode, SmoothError, SmoothingParams};
}
