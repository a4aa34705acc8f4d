//! Image containers used throughout the smoother.
//!
//! - [`PixelBuffer`]: owned, channel-interleaved `f32` image.
//! - [`Mask`]: owned 8-bit flag image (inpainting targets, resize anchors).
//! - [`Sampler`]: clamped sub-pixel sampling (bilinear / nearest).
//! - [`ResizeMode`]: geometric resize used by the resize operating mode.
//! - [`io`]: file helpers for the command line tools.
pub mod buffer;
pub mod io;
pub mod mask;
pub mod resize;
pub mod sample;
pub mod traits;

pub use self::buffer::PixelBuffer;
pub use self::mask::Mask;
pub use self::resize::ResizeMode;
pub use self::sample::{Bilinear, Interpolation, Nearest, Sampler};
pub use self::traits::{ImageView, ImageViewMut, Rows};
