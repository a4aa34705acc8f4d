//! Separable Gaussian smoothing with replicate borders.
//!
//! Used to regularise the structure tensor field: the raw outer products of
//! the gradient are noisy, and averaging them over a Gaussian window of
//! standard deviation `sigma` yields a stable local orientation estimate.
//!
//! Design
//! - A 1D kernel ([`GaussianKernel`]) is applied along X, then along Y.
//! - Border samples clamp to the image extents (replicate).
//! - Every channel is filtered independently.
//!
//! Complexity: O(W·H·C·taps) per pass.

pub mod filters;

pub use filters::{apply, GaussianKernel, SeparableFilter};
