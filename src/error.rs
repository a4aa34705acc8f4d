//! Smoother error types.

use thiserror::Error;

/// Errors surfaced at the `prepare` / `run_iteration` / `finish` boundary.
///
/// Per-pixel numeric trouble is never an error: degenerate tensors are
/// replaced inline and counted in the run report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SmoothError {
    /// Parameter validation failed or a mode-specific input is missing or
    /// inconsistent with the image.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The smoother has not been (successfully) prepared.
    #[error("smoother is not prepared")]
    NotPrepared,

    /// Every configured iteration has already run.
    #[error("all iterations already completed")]
    IterationsExhausted,
}

pub type Result<T> = std::result::Result<T, SmoothError>;

pub(crate) fn invalid(msg: impl Into<String>) -> SmoothError {
    SmoothError::InvalidConfiguration(msg.into())
}
