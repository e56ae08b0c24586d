//! Run configuration: INI lookup, typed tester settings and per-frame inputs.

/// Minimal INI document parser.
pub mod ini;
/// Typed run configuration, camera INI and descriptor readers.
pub mod tester;
