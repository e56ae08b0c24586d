//! Phase sequencing over one loaded configuration.

/// Session and phase summaries.
pub mod pipeline;
