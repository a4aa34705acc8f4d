//! Mode-specific preprocessing of the working image.
//!
//! - [`fill_holes`]: initial guess for inpainting holes.
//! - [`anchor_mask`]: destination pixels that coincide with source pixels.
//! - [`resample_flow`]: bring a vector field to the working resolution.
use super::mode::InitFill;
use crate::image::{Mask, PixelBuffer, ResizeMode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WHITE: f32 = 255.0;

/// Overwrite the set pixels of `mask` according to `fill`.
///
/// Returns the number of hole pixels that could not be assigned, which is
/// only non-zero for [`InitFill::Interpolated`] when a hole has no known
/// pixel connected to it.
pub fn fill_holes(image: &mut PixelBuffer, mask: &Mask, fill: InitFill, seed: u64) -> usize {
    if image.is_empty() {
        return 0;
    }
    match fill {
        InitFill::Unchanged => 0,
        InitFill::Black => fill_constant(image, mask, 0.0),
        InitFill::White => fill_constant(image, mask, WHITE),
        InitFill::Noise => fill_noise(image, mask, seed),
        InitFill::Interpolated => fill_interpolated(image, mask),
    }
}

fn fill_constant(image: &mut PixelBuffer, mask: &Mask, value: f32) -> usize {
    for (px, &flag) in image.data.chunks_exact_mut(image.channels).zip(&mask.data) {
        if flag != 0 {
            px.fill(value);
        }
    }
    0
}

/// Uniform noise over the range of the known pixels (`[0, 255]` when the
/// whole image is masked).
fn fill_noise(image: &mut PixelBuffer, mask: &Mask, seed: u64) -> usize {
    let ch = image.channels;
    let known = image
        .data
        .chunks_exact(ch)
        .zip(&mask.data)
        .filter(|(_, flag)| **flag == 0)
        .flat_map(|(px, _)| px.iter().copied())
        .fold(None, |acc: Option<(f32, f32)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        });
    let (lo, hi) = known.unwrap_or((0.0, WHITE));
    let mut rng = StdRng::seed_from_u64(seed);
    for (px, &flag) in image.data.chunks_exact_mut(ch).zip(&mask.data) {
        if flag != 0 {
            for v in px.iter_mut() {
                *v = if hi > lo { rng.gen_range(lo..=hi) } else { lo };
            }
        }
    }
    0
}

/// Onion-peel filling: each pass assigns every hole pixel with at least one
/// known 4-neighbour the mean of those neighbours, then marks it known.
fn fill_interpolated(image: &mut PixelBuffer, mask: &Mask) -> usize {
    let (w, h, ch) = (image.w, image.h, image.channels);
    let mut known: Vec<bool> = mask.data.iter().map(|&f| f == 0).collect();
    let mut remaining = known.iter().filter(|&&k| !k).count();
    let mut frontier = Vec::new();
    let mut mean = vec![0.0f32; ch];
    while remaining > 0 {
        frontier.clear();
        for y in 0..h {
            for x in 0..w {
                if known[y * w + x] {
                    continue;
                }
                mean.fill(0.0);
                let mut n = 0usize;
                for (nx, ny) in neighbours4(x, y, w, h) {
                    if known[ny * w + nx] {
                        for (m, v) in mean.iter_mut().zip(image.pixel(nx, ny)) {
                            *m += v;
                        }
                        n += 1;
                    }
                }
                if n > 0 {
                    let inv = 1.0 / n as f32;
                    frontier.push((x, y, mean.iter().map(|m| m * inv).collect::<Vec<_>>()));
                }
            }
        }
        if frontier.is_empty() {
            break;
        }
        for (x, y, value) in frontier.drain(..) {
            image.pixel_mut(x, y).copy_from_slice(&value);
            known[y * w + x] = true;
            remaining -= 1;
        }
    }
    remaining
}

fn neighbours4(x: usize, y: usize, w: usize, h: usize) -> impl Iterator<Item = (usize, usize)> {
    let left = (x > 0).then(|| (x - 1, y));
    let right = (x + 1 < w).then_some((x + 1, y));
    let up = (y > 0).then(|| (x, y - 1));
    let down = (y + 1 < h).then_some((x, y + 1));
    [left, right, up, down].into_iter().flatten()
}

/// Flags of the `nw × nh` pixels that land exactly on a `w × h` source pixel
/// under the corner-aligned resize mapping.
pub fn anchor_mask(w: usize, h: usize, nw: usize, nh: usize) -> Mask {
    let flags = PixelBuffer::filled(w, h, 1, 1.0).resize_to(nw, nh, ResizeMode::ZeroPad);
    Mask::from_buffer(&flags, 0.5)
}

/// Bilinearly resample a vector field to `w × h`; a no-op copy when the
/// geometry already matches.
pub fn resample_flow(flow: &PixelBuffer, w: usize, h: usize) -> PixelBuffer {
    if flow.w == w && flow.h == h {
        return flow.clone();
    }
    flow.resize_to(w, h, ResizeMode::Bilinear)
}
