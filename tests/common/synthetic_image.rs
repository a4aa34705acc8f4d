use lic_smooth::PixelBuffer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generates a simple high-contrast checkerboard image.
pub fn checkerboard(width: usize, height: usize, cell: usize, channels: usize) -> PixelBuffer {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut img = PixelBuffer::new(width, height, channels);
    for y in 0..height {
        for x in 0..width {
            let sum = x / cell + y / cell;
            let val = if sum & 1 == 0 { 32.0 } else { 220.0 };
            img.pixel_mut(x, y).fill(val);
        }
    }
    img
}

/// Monotonic ramp `base + sx·x + sy·y`.
pub fn ramp(width: usize, height: usize, base: f32, sx: f32, sy: f32) -> PixelBuffer {
    let mut img = PixelBuffer::new(width, height, 1);
    for y in 0..height {
        for x in 0..width {
            img.set(x, y, 0, base + sx * x as f32 + sy * y as f32);
        }
    }
    img
}

/// Pattern invariant under a 180° rotation about the image centre.
pub fn point_symmetric(width: usize, height: usize) -> PixelBuffer {
    let cx = (width as f32 - 1.0) * 0.5;
    let cy = (height as f32 - 1.0) * 0.5;
    let mut img = PixelBuffer::new(width, height, 1);
    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let v = 128.0 + 90.0 * (0.5 * dx + 0.3 * dy).cos() + 30.0 * (0.4 * dx).sin() * (0.7 * dy).sin();
            img.set(x, y, 0, v);
        }
    }
    img
}

/// The 4x4 two-pixel bar used by the end-to-end scenario.
pub fn bar_4x4() -> PixelBuffer {
    #[rustfmt::skip]
    let data = vec![
        0.0,   0.0,   0.0, 0.0,
        0.0,   0.0,   0.0, 0.0,
        0.0, 255.0, 255.0, 0.0,
        0.0,   0.0,   0.0, 0.0,
    ];
    PixelBuffer::from_vec(4, 4, 1, data).expect("4x4 buffer")
}

/// Deterministic pseudo-random texture, uniform in `[lo, hi)`.
pub fn texture(width: usize, height: usize, channels: usize, lo: f32, hi: f32) -> PixelBuffer {
    let mut rng = StdRng::seed_from_u64(0x9e37_79b9);
    let data = (0..width * height * channels)
        .map(|_| rng.gen_range(lo..hi))
        .collect();
    PixelBuffer::from_vec(width, height, channels, data).expect("texture buffer")
}
