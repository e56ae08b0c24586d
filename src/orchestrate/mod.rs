//! Bounded parallel execution of independent jobs.

/// Worker pool and run-level counters.
pub mod pool;
