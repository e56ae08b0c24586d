use std::panic::AssertUnwindSafe;
use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;

use crate::foundation::error::{TesterError, TesterResult};

/// Default number of parallel worker threads.
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// One independent unit of work dispatched by [`TaskOrchestrator`].
pub trait Job: Send {
    /// Short human-readable identification used in log lines.
    fn label(&self) -> String;

    /// Run the job to completion.
    fn run(&self) -> TesterResult<()>;
}

/// Aggregated run-level counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Jobs submitted to the run.
    pub total: u64,
    /// Jobs a worker has started.
    pub dispatched: u64,
    /// Jobs that returned `Ok`.
    pub succeeded: u64,
    /// Jobs that returned an error or panicked.
    pub failed: u64,
}

impl RunStats {
    /// Jobs that have finished, successfully or not.
    pub fn completed(&self) -> u64 {
        self.succeeded + self.failed
    }

    /// Whole-number completion percentage (100 for an empty run).
    pub fn percent_complete(&self) -> u64 {
        if self.total == 0 {
            return 100;
        }
        self.completed() * 100 / self.total
    }

    /// Return `true` when every job succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.total
    }
}

/// Fans independent jobs out over a fixed-size worker pool.
///
/// The only shared state is the [`RunStats`] guard, held just long enough to bump and read
/// the counters. The pool is fully drained before [`TaskOrchestrator::run`] returns.
#[derive(Clone, Debug)]
pub struct TaskOrchestrator {
    phase: String,
    workers: usize,
}

impl TaskOrchestrator {
    /// Create an orchestrator for `phase` with `workers` threads.
    pub fn new(phase: impl Into<String>, workers: usize) -> TesterResult<Self> {
        if workers == 0 {
            return Err(TesterError::validation("worker count must be >= 1"));
        }
        Ok(Self {
            phase: phase.into(),
            workers,
        })
    }

    /// Configured worker count.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Execute all `jobs` and return the final counters.
    ///
    /// Job failures and panics are logged and counted; they never abort sibling jobs.
    pub fn run<J: Job>(&self, jobs: Vec<J>) -> TesterResult<RunStats> {
        let counters = Mutex::new(RunStats {
            total: jobs.len() as u64,
            ..RunStats::default()
        });

        tracing::info!(
            phase = %self.phase,
            jobs = jobs.len(),
            workers = self.workers,
            "starting parallel run"
        );

        let pool = build_thread_pool(self.workers)?;
        pool.install(|| {
            jobs.into_par_iter()
                .for_each(|job| self.execute(&job, &counters));
        });

        let stats = counters
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        tracing::info!(
            "{}: {} succeeded, {} failed out of {}",
            self.phase,
            stats.succeeded,
            stats.failed,
            stats.total
        );
        Ok(stats)
    }

    fn execute<J: Job>(&self, job: &J, counters: &Mutex<RunStats>) {
        let label = job.label();
        bump(counters, |c| c.dispatched += 1);

        let outcome = match std::panic::catch_unwind(AssertUnwindSafe(|| job.run())) {
            Ok(r) => r,
            Err(payload) => Err(TesterError::Other(anyhow::anyhow!(
                "job panicked: {}",
                panic_message(payload.as_ref())
            ))),
        };

        let ok = outcome.is_ok();
        let snapshot = bump(counters, |c| {
            if ok {
                c.succeeded += 1;
            } else {
                c.failed += 1;
            }
        });

        match outcome {
            Ok(()) => {}
            Err(e) if e.is_skip() => {
                tracing::warn!(phase = %self.phase, job = %label, "{e}");
            }
            Err(e) => {
                tracing::error!(phase = %self.phase, job = %label, "job failed: {e:#}");
            }
        }
        tracing::info!(
            "{} progress: {}/{} ({}%) - {label}",
            self.phase,
            snapshot.completed(),
            snapshot.total,
            snapshot.percent_complete()
        );
    }
}

/// Apply `f` to the counters under the guard and return a copy of the result.
fn bump(counters: &Mutex<RunStats>, f: impl FnOnce(&mut RunStats)) -> RunStats {
    let mut guard = counters.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard);
    *guard
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn build_thread_pool(threads: usize) -> TesterResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| TesterError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/orchestrate/pool.rs"]
mod tests;
