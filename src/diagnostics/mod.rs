//! Run diagnostics exposed by the smoother and written by the CLI.
//!
//! `SmoothingReport` is filled in incrementally by `AnisotropicSmoother`:
//! geometry and the preparation timing at `prepare`, one `IterationReport`
//! per pass, and the finishing stage plus total time at `finish`.

pub mod report;
pub mod timing;

pub use report::{IterationReport, SmoothingReport};
pub use timing::{StageTiming, TimingBreakdown};
