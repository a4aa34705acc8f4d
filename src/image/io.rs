//! I/O helpers for images and JSON used by the command line tools.
//!
//! - `load_image`: read a PNG/JPEG/BMP/PNM file into a 1- or 3-channel buffer.
//! - `load_mask`: read a file and threshold its luma at 127.
//! - `load_flow`: read a 2D vector field encoded in the R/G channels.
//! - `save_image`: write a buffer as an 8-bit PNG (clamped, rounded).
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{Mask, PixelBuffer};
use crate::host::{from_dynamic_image, to_dynamic_image};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Luma level above which a mask pixel counts as set.
pub const MASK_THRESHOLD: f32 = 127.0;

/// Load an image from disk, keeping grayscale sources single-channel.
pub fn load_image(path: &Path) -> Result<PixelBuffer, String> {
    let img = image::open(path).map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
    Ok(from_dynamic_image(&img))
}

/// Load a mask image; pixels brighter than [`MASK_THRESHOLD`] are set.
pub fn load_mask(path: &Path) -> Result<Mask, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open mask {}: {e}", path.display()))?
        .into_luma8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    let data = img
        .into_raw()
        .into_iter()
        .map(|v| u8::from(v as f32 > MASK_THRESHOLD))
        .collect();
    Mask::from_vec(w, h, data).ok_or_else(|| format!("Mask {} has inconsistent size", path.display()))
}

/// Load a vector field stored in the red and green channels of an image,
/// mapping `[0, 255]` to `[-1, 1]`.
pub fn load_flow(path: &Path) -> Result<PixelBuffer, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open flow {}: {e}", path.display()))?
        .into_rgb8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    let data = img
        .pixels()
        .flat_map(|p| [p[0], p[1]])
        .map(|v| v as f32 / 127.5 - 1.0)
        .collect();
    PixelBuffer::from_vec(w, h, 2, data)
        .ok_or_else(|| format!("Flow {} has inconsistent size", path.display()))
}

/// Save a buffer as an 8-bit PNG, clamping samples into `[0, 255]`.
pub fn save_image(image: &PixelBuffer, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    to_dynamic_image(image)
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
