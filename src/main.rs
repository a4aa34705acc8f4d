use lic_smooth::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() {
    // Demo: restore a noisy vertical step edge and compare the edge contrast
    let (w, h) = (64usize, 48usize);
    let mut input = PixelBuffer::new(w, h, 1);
    let mut rng = StdRng::seed_from_u64(0x2545_f491);
    for y in 0..h {
        for x in 0..w {
            let noise: f32 = rng.gen_range(-20.0..20.0);
            let base = if x < w / 2 { 60.0 } else { 190.0 };
            input.set(x, y, 0, base + noise);
        }
    }

    let params = SmoothingParams::default().with_iterations(3);
    match smooth(params, Mode::Restore, input) {
        Ok((out, report)) => {
            let row = h / 2;
            let left = out.at(w / 4, row, 0);
            let right = out.at(3 * w / 4, row, 0);
            println!(
                "left={left:.1} right={right:.1} iterations={} latency_ms={:.3}",
                report.iterations.len(),
                report.timing.total_ms
            );
        }
        Err(err) => eprintln!("Error: {err}"),
    }
}
