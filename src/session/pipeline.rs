use std::fmt;
use std::path::Path;

use crate::compare::runner::compare_catalog;
use crate::config::tester::TesterConfig;
use crate::discovery::resolver::{DiscoverySession, FrameCatalog};
use crate::foundation::error::{TesterError, TesterResult};
use crate::localize::localizer::localize_catalog;
use crate::orchestrate::pool::{DEFAULT_MAX_WORKERS, RunStats};
use crate::render::runner::render_catalog;

/// One stage of the test pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Rewrite descriptors to point at the local asset tree.
    Localize,
    /// Render every frame with both renderer builds.
    Render,
    /// Compare the two builds' renders and write reports.
    Compare,
}

impl Phase {
    /// Every phase, in pipeline order.
    pub const ALL: [Phase; 3] = [Phase::Localize, Phase::Render, Phase::Compare];

    /// Lower-case phase name used in log lines.
    pub fn name(self) -> &'static str {
        match self {
            Phase::Localize => "localize",
            Phase::Render => "render",
            Phase::Compare => "compare",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Final counters of one phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseSummary {
    /// Phase the counters belong to.
    pub phase: Phase,
    /// Job counters; all zero when the phase was aborted.
    pub stats: RunStats,
    /// `true` when the phase stopped before dispatching work (configuration problems).
    pub aborted: bool,
}

impl PhaseSummary {
    /// Return `true` when the phase ran and every job succeeded.
    pub fn is_clean(&self) -> bool {
        !self.aborted && self.stats.all_succeeded()
    }
}

/// Options for a [`TesterSession`].
#[derive(Clone, Debug)]
pub struct SessionOpts {
    /// Worker threads used by the render and compare phases.
    pub max_workers: usize,
    /// Synthesize placeholder sport/stadium/category folders for shallow events while
    /// localizing.
    pub create_folders: bool,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            create_folders: false,
        }
    }
}

/// Runs pipeline phases against one loaded configuration.
#[derive(Clone, Debug)]
pub struct TesterSession {
    config: TesterConfig,
    opts: SessionOpts,
}

impl TesterSession {
    /// Create a session; the worker count must be at least one.
    pub fn new(config: TesterConfig, opts: SessionOpts) -> TesterResult<Self> {
        if opts.max_workers == 0 {
            return Err(TesterError::validation("max workers must be >= 1"));
        }
        Ok(Self { config, opts })
    }

    /// Load the configuration INI at `ini_path` and create a session.
    pub fn from_ini(ini_path: &Path, opts: SessionOpts) -> TesterResult<Self> {
        Self::new(TesterConfig::load(ini_path)?, opts)
    }

    /// Loaded configuration.
    pub fn config(&self) -> &TesterConfig {
        &self.config
    }

    /// Discover the frame catalog below the configured asset root.
    pub fn discover(&self, create_folders: bool) -> TesterResult<FrameCatalog> {
        let catalog = DiscoverySession::new(&self.config.set_test_path, &self.config.event_pattern)
            .with_folder_creation(create_folders)
            .discover()?;
        if catalog.is_empty() {
            tracing::warn!(
                root = %self.config.set_test_path.display(),
                "no frame folders found to process"
            );
        }
        Ok(catalog)
    }

    /// Localize every discovered frame's descriptor.
    pub fn localize(&self) -> TesterResult<RunStats> {
        let catalog = self.discover(self.opts.create_folders)?;
        let stats = localize_catalog(&catalog);
        let total = stats.total as u64;
        Ok(RunStats {
            total,
            dispatched: total,
            succeeded: stats.written as u64,
            failed: stats.skipped as u64,
        })
    }

    /// Render every discovered frame with both builds of the configured version pair.
    pub fn render(&self) -> TesterResult<RunStats> {
        let pair = self.config.version_pair()?;
        let renderer_root = self.config.renderer_root()?;
        let catalog = self.discover(false)?;
        if catalog.is_empty() {
            return Ok(RunStats::default());
        }
        render_catalog(&catalog, renderer_root, &pair, self.opts.max_workers)
    }

    /// Compare the rendered sequences of every discovered frame.
    pub fn compare(&self) -> TesterResult<RunStats> {
        let pair = self.config.version_pair()?;
        let catalog = self.discover(false)?;
        if catalog.is_empty() {
            return Ok(RunStats::default());
        }
        compare_catalog(&catalog, &pair, self.opts.max_workers)
    }

    /// Run one phase to completion.
    ///
    /// Errors that stop the phase before or during dispatch are logged and reported as
    /// an aborted summary instead of being returned.
    #[tracing::instrument(skip(self))]
    pub fn run_phase(&self, phase: Phase) -> PhaseSummary {
        tracing::info!("starting phase: {phase}");
        let result = match phase {
            Phase::Localize => self.localize(),
            Phase::Render => self.render(),
            Phase::Compare => self.compare(),
        };
        match result {
            Ok(stats) => PhaseSummary {
                phase,
                stats,
                aborted: false,
            },
            Err(e) => {
                tracing::error!("{phase} aborted: {e:#}");
                PhaseSummary {
                    phase,
                    stats: RunStats::default(),
                    aborted: true,
                }
            }
        }
    }

    /// Run localize, render and compare in order; each phase drains before the next starts.
    pub fn run_all(&self) -> Vec<PhaseSummary> {
        Phase::ALL
            .into_iter()
            .map(|phase| self.run_phase(phase))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/pipeline.rs"]
mod tests;
