mod common;

use common::init_logging;
use common::synthetic_image::{checkerboard, texture};
use lic_smooth::image::{Bilinear, Nearest, PixelBuffer, Sampler};
use lic_smooth::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Sampler double that counts requests outside `[0, w-1] × [0, h-1]`.
struct BoundsChecked<S> {
    inner: S,
    samples: AtomicUsize,
    violations: AtomicUsize,
}

impl<S: Sampler> BoundsChecked<S> {
    fn new(inner: S) -> Self {
        Self {
            inner,
            samples: AtomicUsize::new(0),
            violations: AtomicUsize::new(0),
        }
    }
}

impl<S: Sampler> Sampler for BoundsChecked<S> {
    fn sample_into(&self, buf: &PixelBuffer, x: f32, y: f32, out: &mut [f32]) {
        self.samples.fetch_add(1, Ordering::Relaxed);
        let max_x = buf.w.saturating_sub(1) as f32;
        let max_y = buf.h.saturating_sub(1) as f32;
        if !(x >= 0.0 && y >= 0.0 && x <= max_x && y <= max_y) {
            self.violations.fetch_add(1, Ordering::Relaxed);
        }
        self.inner.sample_into(buf, x, y, out);
    }
}

fn run_checked<S: Sampler>(sampler: &BoundsChecked<S>, params: SmoothingParams, mode: Mode, input: PixelBuffer) {
    let iterations = params.iterations;
    let mut smoother = AnisotropicSmoother::new(params);
    smoother.prepare(mode, input).expect("valid configuration");
    for _ in 0..iterations {
        smoother.run_iteration_with(sampler).expect("iteration runs");
    }
    assert!(smoother.is_done());
    smoother.finish().expect("finish");
}

#[test]
fn integration_paths_never_sample_outside_the_image() {
    init_logging();
    let params = SmoothingParams::default()
        .with_iterations(2)
        .with_time_step(80.0)
        .with_angle_step(20.0);

    let linear = BoundsChecked::new(Bilinear);
    run_checked(&linear, params.clone(), Mode::Restore, checkerboard(17, 13, 4, 3));
    run_checked(
        &linear,
        params.clone(),
        Mode::Resize {
            width: 25,
            height: 9,
            anchor_original_pixels: true,
            interpolation: ResizeMode::Bilinear,
        },
        texture(9, 7, 1, 0.0, 255.0),
    );
    let mut flow = texture(8, 8, 2, -1.0, 1.0);
    flow.data.iter_mut().for_each(|v| *v *= 3.0);
    run_checked(&linear, params.clone(), Mode::VisualizeFlow { flow }, texture(15, 15, 1, 0.0, 255.0));
    assert!(linear.samples.load(Ordering::Relaxed) > 0);
    assert_eq!(linear.violations.load(Ordering::Relaxed), 0);

    let nearest = BoundsChecked::new(Nearest);
    let mut hole = Mask::new(12, 12);
    hole.set(0, 0, true);
    hole.set(11, 6, true);
    run_checked(
        &nearest,
        params,
        Mode::Inpaint {
            mask: hole,
            init: InitFill::Noise,
            dilation: 2,
        },
        texture(12, 12, 3, 0.0, 255.0),
    );
    assert!(nearest.samples.load(Ordering::Relaxed) > 0);
    assert_eq!(nearest.violations.load(Ordering::Relaxed), 0);
}
