//! Iterative anisotropic smoothing driver.
//!
//! `AnisotropicSmoother` walks a small state machine:
//!
//! ```text
//! Unprepared --prepare--> Prepared --run_iteration--> Iterating(k) --…--> Done
//!      ^                                                                   |
//!      +------------------------------- finish ----------------------------+
//! ```
//!
//! `prepare` validates everything before allocating, so a rejected run leaves
//! no partial state behind (the smoother reports `Failed` until the next
//! `prepare`). Each pass rebuilds the diffusion tensors, sweeps every angle
//! of `[0°, 180°)` with the line integrator, normalises `dest` by `sum` and
//! swaps it in as the next image.
//!
//! Complexity per pass: O(W·H·A·L) where A is the number of angles and L the
//! path length in steps (`2·precision·√(2·dt)·|W| / dl`).

pub mod mode;
pub mod params;
pub mod prepare;
mod workspace;

pub use mode::{InitFill, Mode};
pub use params::SmoothingParams;

use self::prepare::{anchor_mask, fill_holes, resample_flow};
use self::workspace::{TensorSource, Workspace};
use crate::angle::AngleSweep;
use crate::diagnostics::{IterationReport, SmoothingReport};
use crate::error::{invalid, Result, SmoothError};
use crate::host::{ProgressCallback, ProgressReporter};
use crate::image::{Bilinear, Interpolation, Mask, Nearest, PixelBuffer, Sampler};
use crate::lic::{project_field, sweep, SweepInputs};
use crate::tensor::structure_tensor;
use log::{debug, warn};
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SmootherState {
    Unprepared,
    Prepared,
    /// `k` passes completed, more to go.
    Iterating(usize),
    Done,
    Failed,
}

/// Mode-dependent post-processing applied by `finish`.
enum Finishing {
    /// Clamp into the value range observed at preparation.
    Restore { range: Option<(f32, f32)> },
    /// Multiply by the per-pixel flow magnitude.
    Flow { magnitude: PixelBuffer },
    Plain,
}

pub struct AnisotropicSmoother {
    params: SmoothingParams,
    state: SmootherState,
    workspace: Option<Workspace>,
    finishing: Finishing,
    progress: ProgressReporter,
    report: SmoothingReport,
    started: Option<Instant>,
}

impl AnisotropicSmoother {
    pub fn new(params: SmoothingParams) -> Self {
        Self {
            params,
            state: SmootherState::Unprepared,
            workspace: None,
            finishing: Finishing::Plain,
            progress: ProgressReporter::default(),
            report: SmoothingReport::default(),
            started: None,
        }
    }

    pub fn params(&self) -> &SmoothingParams {
        &self.params
    }

    /// Replace the parameters. Any prepared run is discarded.
    pub fn set_params(&mut self, params: SmoothingParams) {
        self.params = params;
        self.release();
        self.state = SmootherState::Unprepared;
    }

    /// Install a host progress callback, kept across runs.
    pub fn set_progress(&mut self, callback: ProgressCallback) {
        self.progress.set_callback(callback);
    }

    pub fn state(&self) -> SmootherState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == SmootherState::Done
    }

    /// Report of the current (or last finished) run.
    pub fn report(&self) -> &SmoothingReport {
        &self.report
    }

    /// Image the next pass will read (the latest result once a pass ran).
    pub fn working_image(&self) -> Option<&PixelBuffer> {
        self.workspace.as_ref().map(|ws| &ws.image)
    }

    /// Pixels integrated by each sweep, when restricted.
    pub fn active_mask(&self) -> Option<&Mask> {
        self.workspace.as_ref().and_then(|ws| ws.active.as_ref())
    }

    /// Validate the configuration and mode inputs, then build the working
    /// buffers for `mode`.
    pub fn prepare(&mut self, mode: Mode, input: PixelBuffer) -> Result<()> {
        self.release();
        self.state = SmootherState::Unprepared;
        if let Err(err) = self
            .params
            .validate()
            .and_then(|()| validate_mode(&mode, &input))
        {
            debug!("AnisotropicSmoother::prepare rejected: {err}");
            self.state = SmootherState::Failed;
            return Err(err);
        }

        let t0 = Instant::now();
        self.started = Some(t0);
        self.report = SmoothingReport {
            mode: mode.name(),
            input_width: input.w,
            input_height: input.h,
            channels: input.channels,
            ..Default::default()
        };

        let workspace = if input.is_empty() {
            debug!("AnisotropicSmoother::prepare empty input, nothing to smooth");
            Workspace::new(input, TensorSource::Fixed)
        } else {
            self.setup_mode(mode, input)
        };

        let angles = AngleSweep::count_angles(self.params.angle_step_deg);
        let active = workspace.active_pixels();
        self.progress
            .reset((self.params.iterations * angles * active) as u64);
        self.report.output_width = workspace.image.w;
        self.report.output_height = workspace.image.h;
        self.report.active_pixels = active;
        self.report.timing.push("prepare", elapsed_ms(t0));
        debug!(
            "AnisotropicSmoother::prepare mode={} {}x{}x{} active={} angles={}",
            self.report.mode,
            workspace.image.w,
            workspace.image.h,
            workspace.image.channels,
            active,
            angles
        );
        self.workspace = Some(workspace);
        self.state = SmootherState::Prepared;
        Ok(())
    }

    fn setup_mode(&mut self, mode: Mode, input: PixelBuffer) -> Workspace {
        match mode {
            Mode::Restore => {
                self.finishing = Finishing::Restore {
                    range: input.min_max(),
                };
                let sigma = self.params.tensor_sigma;
                Workspace::new(input, TensorSource::Image { sigma })
            }
            Mode::Inpaint {
                mut mask,
                init,
                dilation,
            } => {
                mask.dilate(dilation);
                let mut image = input;
                let unfilled = fill_holes(&mut image, &mask, init, self.params.noise_seed);
                if unfilled > 0 {
                    warn!("AnisotropicSmoother::prepare {unfilled} hole pixels have no known neighbour");
                }
                self.report.unfilled_pixels = unfilled;
                let mut ws = Workspace::new(image, TensorSource::Fixed);
                ws.structure = structure_tensor(&ws.image, self.params.tensor_sigma, Some(&mask));
                ws.active = Some(mask);
                ws
            }
            Mode::Resize {
                width,
                height,
                anchor_original_pixels,
                interpolation,
            } => {
                let image = input.resize_to(width, height, interpolation);
                let sigma = self.params.tensor_sigma;
                let mut ws = Workspace::new(image, TensorSource::Image { sigma });
                if anchor_original_pixels {
                    let mut active = anchor_mask(input.w, input.h, width, height);
                    active.invert();
                    ws.active = Some(active);
                }
                ws
            }
            Mode::VisualizeFlow { flow } => {
                let flow = resample_flow(&flow, input.w, input.h);
                self.finishing = Finishing::Flow {
                    magnitude: flow.pointwise_norm(),
                };
                Workspace::new(input, TensorSource::Flow(flow))
            }
        }
    }

    /// Run one pass with the configured interpolation.
    pub fn run_iteration(&mut self) -> Result<()> {
        match self.params.interpolation {
            Interpolation::Linear => self.run_iteration_with(&Bilinear),
            Interpolation::Nearest => self.run_iteration_with(&Nearest),
        }
    }

    /// Run one pass sampling through `sampler`.
    pub fn run_iteration_with<S: Sampler + ?Sized>(&mut self, sampler: &S) -> Result<()> {
        let index = match self.state {
            SmootherState::Prepared => 0,
            SmootherState::Iterating(k) => k,
            SmootherState::Done => return Err(SmoothError::IterationsExhausted),
            SmootherState::Unprepared | SmootherState::Failed => {
                return Err(SmoothError::NotPrepared)
            }
        };
        let ws = self.workspace.as_mut().ok_or(SmoothError::NotPrepared)?;
        let t0 = Instant::now();
        let mut it = IterationReport {
            index,
            ..Default::default()
        };

        if !ws.image.is_empty() {
            it.degenerate_tensors = ws.update_tensors(self.params.limiter());
            if it.degenerate_tensors > 0 {
                warn!(
                    "AnisotropicSmoother::run_iteration {} degenerate tensors replaced by identity",
                    it.degenerate_tensors
                );
            }
            ws.clear_accumulators();
            let lic = self.params.lic();
            let active = ws.active_pixels() as u64;
            for angle in AngleSweep::new(self.params.angle_step_deg) {
                project_field(&ws.diffusion, angle, &mut ws.field);
                let inputs = SweepInputs {
                    image: &ws.image,
                    field: &ws.field,
                    active: ws.active.as_ref(),
                };
                it.integrated += sweep(sampler, inputs, &lic, &mut ws.dest, &mut ws.sum);
                it.angles += 1;
                self.progress.advance(active);
            }
            it.fallback_pixels = ws.finalize();
            ws.swap();
        }

        it.elapsed_ms = elapsed_ms(t0);
        debug!(
            "AnisotropicSmoother::run_iteration {} angles={} integrated={} fallback={} {:.3} ms",
            index, it.angles, it.integrated, it.fallback_pixels, it.elapsed_ms
        );
        self.report.iterations.push(it);
        self.state = if index + 1 >= self.params.iterations {
            SmootherState::Done
        } else {
            SmootherState::Iterating(index + 1)
        };
        Ok(())
    }

    /// Run every remaining pass.
    pub fn run(&mut self) -> Result<()> {
        while !self.is_done() {
            self.run_iteration()?;
        }
        Ok(())
    }

    /// Apply the final mode-specific scaling and optional `[0, 255]`
    /// normalisation, release the work buffers and hand back the result.
    pub fn finish(&mut self) -> Result<PixelBuffer> {
        match self.state {
            SmootherState::Prepared | SmootherState::Iterating(_) | SmootherState::Done => {}
            SmootherState::Unprepared | SmootherState::Failed => {
                return Err(SmoothError::NotPrepared)
            }
        }
        let ws = self.workspace.take().ok_or(SmoothError::NotPrepared)?;
        let t0 = Instant::now();
        let mut image = ws.image;

        match std::mem::replace(&mut self.finishing, Finishing::Plain) {
            Finishing::Restore { range: Some((lo, hi)) } => {
                for v in &mut image.data {
                    *v = v.clamp(lo, hi);
                }
            }
            Finishing::Flow { magnitude } => {
                if image.channels > 0 {
                    for (px, &m) in image.data.chunks_exact_mut(image.channels).zip(&magnitude.data) {
                        for v in px {
                            *v *= m;
                        }
                    }
                }
            }
            Finishing::Restore { range: None } | Finishing::Plain => {}
        }
        if self.params.normalize_output {
            image.normalize_range(0.0, 255.0);
        }

        self.progress.complete();
        self.report.timing.push("finish", elapsed_ms(t0));
        if let Some(started) = self.started.take() {
            self.report.timing.total_ms = elapsed_ms(started);
        }
        self.release();
        self.state = SmootherState::Unprepared;
        debug!(
            "AnisotropicSmoother::finish {}x{} total {:.3} ms",
            image.w, image.h, self.report.timing.total_ms
        );
        Ok(image)
    }

    fn release(&mut self) {
        self.workspace = None;
        self.finishing = Finishing::Plain;
    }
}

/// One-shot helper: prepare, run every pass and finish.
pub fn smooth(
    params: SmoothingParams,
    mode: Mode,
    input: PixelBuffer,
) -> Result<(PixelBuffer, SmoothingReport)> {
    let mut smoother = AnisotropicSmoother::new(params);
    smoother.prepare(mode, input)?;
    smoother.run()?;
    let output = smoother.finish()?;
    Ok((output, smoother.report().clone()))
}

fn validate_mode(mode: &Mode, input: &PixelBuffer) -> Result<()> {
    match mode {
        Mode::Restore => Ok(()),
        Mode::Inpaint { mask, .. } => {
            if mask.w != input.w || mask.h != input.h {
                return Err(invalid(format!(
                    "inpaint mask is {}x{} but the image is {}x{}",
                    mask.w, mask.h, input.w, input.h
                )));
            }
            Ok(())
        }
        Mode::Resize { width, height, .. } => {
            if *width == 0 || *height == 0 {
                return Err(invalid(format!(
                    "resize target must be non-empty (got {width}x{height})"
                )));
            }
            Ok(())
        }
        Mode::VisualizeFlow { flow } => {
            if flow.channels != 2 {
                return Err(invalid(format!(
                    "flow field must have 2 channels (got {})",
                    flow.channels
                )));
            }
            if flow.is_empty() && !input.is_empty() {
                return Err(invalid("flow field is empty"));
            }
            Ok(())
        }
    }
}

fn elapsed_ms(t0: Instant) -> f64 {
    t0.elapsed().as_secs_f64() * 1000.0
}
