//! Comparison reports.

/// `compareResult.xml` model and writer.
pub mod xml;
