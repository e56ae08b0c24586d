//! Image sequence comparison.

/// Diff and alpha image construction.
pub mod artifacts;
/// Sequence comparison engine.
pub mod engine;
/// Luminance metrics (MSE, SSIM, absolute difference).
pub mod metrics;
/// Compare phase and ad-hoc folder comparison.
pub mod runner;
