mod common;

use common::init_logging;
use common::synthetic_image::{point_symmetric, ramp, texture};
use lic_smooth::prelude::*;
use lic_smooth::SmootherState;

fn assert_invalid<T: std::fmt::Debug>(result: Result<T, SmoothError>) {
    assert!(
        matches!(result, Err(SmoothError::InvalidConfiguration(_))),
        "expected InvalidConfiguration, got {result:?}"
    );
}

#[test]
fn zero_time_step_returns_the_prepared_image() {
    init_logging();
    let input = texture(13, 9, 3, 0.0, 255.0);
    let params = SmoothingParams::default().with_time_step(0.0);

    let (out, report) = smooth(params.clone(), Mode::Restore, input.clone()).unwrap();
    assert_eq!(out, input);
    assert_eq!(report.iterations[0].integrated, 0);
    assert_eq!(report.iterations[0].fallback_pixels, 13 * 9);

    let mode = Mode::Resize {
        width: 20,
        height: 15,
        anchor_original_pixels: false,
        interpolation: ResizeMode::Bilinear,
    };
    let (out, _) = smooth(params, mode, input.clone()).unwrap();
    assert_eq!(out, input.resize_to(20, 15, ResizeMode::Bilinear));
}

#[test]
fn point_symmetric_input_stays_point_symmetric() {
    init_logging();
    let (w, h) = (21usize, 17usize);
    let input = point_symmetric(w, h);
    for angle_step in [45.0, 30.0] {
        let params = SmoothingParams::default()
            .with_time_step(2.0)
            .with_angle_step(angle_step);
        let (out, _) = smooth(params, Mode::Restore, input.clone()).unwrap();
        for y in 5..h - 5 {
            for x in 5..w - 5 {
                let a = out.at(x, y, 0);
                let b = out.at(w - 1 - x, h - 1 - y, 0);
                assert!(
                    (a - b).abs() < 0.05,
                    "step {angle_step}: ({x},{y})={a} vs mirrored {b}"
                );
            }
        }
    }
}

#[test]
fn ramp_output_stays_within_input_range() {
    init_logging();
    let input = ramp(16, 12, 10.0, 5.0, 3.0);
    let (lo, hi) = input.min_max().unwrap();
    for interpolation in [Interpolation::Linear, Interpolation::Nearest] {
        let params = SmoothingParams::default()
            .with_iterations(3)
            .with_time_step(30.0)
            .with_interpolation(interpolation);
        // same-size resize: plain smoothing without the restore clamp
        let mode = Mode::Resize {
            width: 16,
            height: 12,
            anchor_original_pixels: false,
            interpolation: ResizeMode::Bilinear,
        };
        let (out, _) = smooth(params, mode, input.clone()).unwrap();
        for &v in &out.data {
            assert!(v >= lo - 1e-3 && v <= hi + 1e-3, "{interpolation:?}: {v} outside [{lo}, {hi}]");
        }
    }
}

#[test]
fn inpainting_leaves_known_pixels_untouched() {
    init_logging();
    let input = texture(10, 10, 1, 80.0, 120.0);
    let mut mask = Mask::new(10, 10);
    for y in 4..=6 {
        for x in 4..=6 {
            mask.set(x, y, true);
        }
    }
    let params = SmoothingParams::default()
        .with_iterations(2)
        .with_time_step(5.0)
        .with_tensor_sigma(0.5);
    let mode = Mode::Inpaint {
        mask: mask.clone(),
        init: InitFill::Black,
        dilation: 0,
    };
    let (out, report) = smooth(params, mode, input.clone()).unwrap();
    assert_eq!(report.active_pixels, 9);

    for (x, y) in [(0, 0), (9, 0), (0, 9), (9, 9)] {
        assert_eq!(out.at(x, y, 0).to_bits(), input.at(x, y, 0).to_bits());
    }
    for y in 0..10 {
        for x in 0..10 {
            if mask.is_set(x, y) {
                assert!(out.at(x, y, 0) > 0.0, "hole ({x},{y}) was not filled");
            } else {
                assert_eq!(out.at(x, y, 0), input.at(x, y, 0));
            }
        }
    }
}

#[test]
fn resize_anchors_hold_original_samples() {
    init_logging();
    let input = texture(4, 3, 3, 0.0, 255.0);
    let baseline = input.resize_to(10, 7, ResizeMode::Nearest);
    let mode = Mode::Resize {
        width: 10,
        height: 7,
        anchor_original_pixels: true,
        interpolation: ResizeMode::Bilinear,
    };
    let mut smoother = AnisotropicSmoother::new(SmoothingParams::default().with_iterations(2));
    smoother.prepare(mode, input).unwrap();

    let active = smoother.active_mask().expect("anchors restrict the sweep").clone();
    let anchors: Vec<(usize, usize)> = (0..7)
        .flat_map(|y| (0..10).map(move |x| (x, y)))
        .filter(|&(x, y)| !active.is_set(x, y))
        .collect();
    assert_eq!(anchors.len(), 12);

    let start = smoother.working_image().unwrap().clone();
    for &(x, y) in &anchors {
        assert_eq!(start.pixel(x, y), baseline.pixel(x, y), "anchor ({x},{y})");
    }

    smoother.run().unwrap();
    let out = smoother.finish().unwrap();
    for &(x, y) in &anchors {
        assert_eq!(out.pixel(x, y), baseline.pixel(x, y), "anchor ({x},{y}) moved");
    }
}

#[test]
fn invalid_configurations_are_rejected_before_allocation() {
    init_logging();
    let input = texture(6, 6, 1, 0.0, 1.0);

    assert_invalid(smooth(
        SmoothingParams::default().with_iterations(0),
        Mode::Restore,
        input.clone(),
    ));
    assert_invalid(smooth(
        SmoothingParams::default().with_limiters(0.9, 0.5),
        Mode::Restore,
        input.clone(),
    ));
    assert_invalid(smooth(
        SmoothingParams::default(),
        Mode::Inpaint {
            mask: Mask::new(5, 6),
            init: InitFill::Noise,
            dilation: 0,
        },
        input.clone(),
    ));
    assert_invalid(smooth(
        SmoothingParams::default(),
        Mode::Resize {
            width: 0,
            height: 4,
            anchor_original_pixels: true,
            interpolation: ResizeMode::Bilinear,
        },
        input.clone(),
    ));
    assert_invalid(smooth(
        SmoothingParams::default(),
        Mode::VisualizeFlow {
            flow: PixelBuffer::new(0, 0, 2),
        },
        input.clone(),
    ));

    let mut smoother = AnisotropicSmoother::new(SmoothingParams::default().with_angle_step(0.0));
    assert_invalid(smoother.prepare(Mode::Restore, input));
    assert_eq!(smoother.state(), SmootherState::Failed);
    assert!(smoother.working_image().is_none());
    assert_eq!(smoother.finish(), Err(SmoothError::NotPrepared));
}

#[test]
fn empty_input_yields_empty_output() {
    init_logging();
    let input = PixelBuffer::new(0, 5, 3);
    let params = SmoothingParams::default().with_iterations(2);
    let (out, report) = smooth(params, Mode::Restore, input).unwrap();
    assert!(out.is_empty());
    assert_eq!(report.iterations.len(), 2);
    assert!(report.iterations.iter().all(|it| it.angles == 0));
}

#[test]
fn visualize_flow_smears_noise_along_the_field() {
    init_logging();
    let input = texture(24, 24, 1, 0.0, 255.0);
    let mut flow = PixelBuffer::new(12, 12, 2);
    for px in flow.data.chunks_exact_mut(2) {
        px.copy_from_slice(&[1.0, 0.0]);
    }
    let params = SmoothingParams::default().with_normalize_output(true);
    let (out, _) = smooth(params, Mode::VisualizeFlow { flow }, input).unwrap();
    assert_eq!((out.w, out.h), (24, 24));

    // horizontal streaks: neighbours along x agree more than along y
    let mut dx = 0.0f32;
    let mut dy = 0.0f32;
    for y in 1..23 {
        for x in 1..23 {
            dx += (out.at(x + 1, y, 0) - out.at(x, y, 0)).abs();
            dy += (out.at(x, y + 1, 0) - out.at(x, y, 0)).abs();
        }
    }
    assert!(dx < dy, "dx={dx} dy={dy}");
    let (lo, hi) = out.min_max().unwrap();
    assert!(lo >= -1e-3 && hi <= 255.0 + 1e-3);
}
