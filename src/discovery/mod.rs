//! Event and frame discovery below an asset root of varying depth.

/// Wildcard event-name and frame-name matching.
pub mod pattern;
/// Recursive catalog builder.
pub mod resolver;
