use super::timing::TimingBreakdown;
use serde::Serialize;

/// Counters of one smoothing pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationReport {
    pub index: usize,
    pub angles: usize,
    /// Pixel-angle traces that accumulated a non-zero weight.
    pub integrated: usize,
    /// Pixels with no accumulated weight, copied from the previous image.
    pub fallback_pixels: usize,
    /// Tensors replaced by the isotropic unit tensor.
    pub degenerate_tensors: usize,
    pub elapsed_ms: f64,
}

/// Summary of a complete run, from `prepare` to `finish`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmoothingReport {
    pub mode: &'static str,
    pub input_width: usize,
    pub input_height: usize,
    pub output_width: usize,
    pub output_height: usize,
    pub channels: usize,
    /// Pixels integrated in every sweep (all pixels, or the active mask).
    pub active_pixels: usize,
    /// Inpainting holes the initial fill could not reach.
    pub unfilled_pixels: usize,
    pub iterations: Vec<IterationReport>,
    pub timing: TimingBreakdown,
}

impl SmoothingReport {
    pub fn degenerate_tensors(&self) -> usize {
        self.iterations.iter().map(|it| it.degenerate_tensors).sum()
    }

    pub fn fallback_pixels(&self) -> usize {
        self.iterations.iter().map(|it| it.fallback_pixels).sum()
    }
}
