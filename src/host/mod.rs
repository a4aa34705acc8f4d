//! Boundary with the embedding application.
//!
//! The smoother works on `f32` [`PixelBuffer`]s; hosts usually hold 8-bit
//! interleaved pixels. The helpers here convert between the two without any
//! implicit rescaling (an 8-bit sample `v` becomes `v as f32`), and
//! [`ProgressReporter`] forwards rate-limited progress to a host callback.
pub mod progress;

pub use progress::{ProgressCallback, ProgressReporter};

use crate::image::PixelBuffer;
use image::{DynamicImage, GrayImage, RgbImage};

/// Wrap 8-bit interleaved samples as a float buffer. Returns `None` when the
/// slice length does not match `w * h * channels`.
pub fn from_interleaved_u8(w: usize, h: usize, channels: usize, data: &[u8]) -> Option<PixelBuffer> {
    let samples = data.iter().map(|&v| v as f32).collect();
    PixelBuffer::from_vec(w, h, channels, samples)
}

/// Convert back to 8-bit samples, rounding and clamping into `[0, 255]`.
/// Non-finite samples map to 0.
pub fn to_interleaved_u8(buf: &PixelBuffer) -> Vec<u8> {
    buf.data.iter().map(|&v| quantize_u8(v)).collect()
}

#[inline]
fn quantize_u8(v: f32) -> u8 {
    if v.is_finite() {
        v.round().clamp(0.0, 255.0) as u8
    } else {
        0
    }
}

/// Convert a decoded image into a 1-channel (grayscale sources) or 3-channel
/// (everything else) buffer. Alpha is dropped.
pub fn from_dynamic_image(img: &DynamicImage) -> PixelBuffer {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let buf = match img {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_) => from_interleaved_u8(w, h, 1, img.to_luma8().as_raw()),
        _ => from_interleaved_u8(w, h, 3, img.to_rgb8().as_raw()),
    };
    buf.unwrap_or_else(|| PixelBuffer::new(w, h, 1))
}

/// Convert a 1- or 3-channel buffer into an 8-bit image. Buffers with two
/// channels are written as grayscale from channel 0; more than three
/// channels keep the first three.
pub fn to_dynamic_image(buf: &PixelBuffer) -> DynamicImage {
    let (w, h) = (buf.w as u32, buf.h as u32);
    match buf.channels {
        3 => RgbImage::from_raw(w, h, to_interleaved_u8(buf)).map(DynamicImage::ImageRgb8),
        c if c > 3 => {
            let rgb = buf
                .data
                .chunks_exact(c)
                .flat_map(|px| px[..3].iter().map(|&v| quantize_u8(v)))
                .collect();
            RgbImage::from_raw(w, h, rgb).map(DynamicImage::ImageRgb8)
        }
        c => {
            let gray = if c == 0 {
                vec![0; buf.w * buf.h]
            } else {
                buf.data.chunks_exact(c).map(|px| quantize_u8(px[0])).collect()
            };
            GrayImage::from_raw(w, h, gray).map(DynamicImage::ImageLuma8)
        }
    }
    .unwrap_or_else(|| DynamicImage::new_luma8(w, h))
}
