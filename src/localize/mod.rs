//! Descriptor path rewriting for local rendering.

/// Per-frame descriptor localization.
pub mod localizer;
