use crate::image::{Mask, PixelBuffer, ResizeMode};
use serde::{Deserialize, Serialize};

/// Operating mode with only the inputs that mode needs.
#[derive(Clone, Debug, PartialEq)]
pub enum Mode {
    /// Edge-preserving denoising of the whole image.
    Restore,
    /// Fill the set pixels of `mask` from their surroundings.
    Inpaint {
        /// Holes to fill; must match the input geometry.
        mask: Mask,
        /// Initial guess written into the holes.
        init: InitFill,
        /// Grow the mask by this many pixels before filling.
        dilation: usize,
    },
    /// Geometric resize followed by diffusion-driven interpolation.
    Resize {
        width: usize,
        height: usize,
        /// Hold pixels that coincide with source pixels fixed.
        anchor_original_pixels: bool,
        /// Interpolation of the initial resize.
        interpolation: ResizeMode,
    },
    /// Smear the input along a caller-supplied 2-channel vector field.
    VisualizeFlow { flow: PixelBuffer },
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Restore => "restore",
            Mode::Inpaint { .. } => "inpaint",
            Mode::Resize { .. } => "resize",
            Mode::VisualizeFlow { .. } => "visualize_flow",
        }
    }
}

/// Initial content of inpainting holes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitFill {
    Black,
    White,
    /// Uniform noise over the observed value range, seeded.
    Noise,
    /// Keep whatever the input holds.
    Unchanged,
    /// Propagate averages of known 4-neighbours inwards.
    #[default]
    Interpolated,
}
