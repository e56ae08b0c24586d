//! Shared constants, value types and the crate error type.

/// Path conventions, version pairs, resolutions and frame spans.
pub mod core;
/// Crate-wide error taxonomy.
pub mod error;
