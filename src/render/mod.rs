//! External renderer invocation.
//!
//! Every (renderer build, frame) pair becomes one job that renders the frame's localized
//! descriptor into a clean folder of the results tree.

/// Renderer subprocess contract and output name normalization.
pub mod invoker;
/// Render phase: build discovery and job fan-out.
pub mod runner;
