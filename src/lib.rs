//! Render-regression harness for a free-viewpoint renderer.
//!
//! The pipeline has three phases, each fanned out over a bounded worker pool:
//!
//! - **localize**: discover every frame below the asset root and rewrite its render
//!   descriptor to reference the local tree
//! - **render**: render each frame with an original and a tester renderer build
//! - **compare**: compare the two image sequences per frame (MSE, SSIM, diff/alpha images)
//!   and write `compareResult.xml`
//!
//! [`TesterSession`] drives the phases from a configuration INI.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Image sequence comparison.
pub mod compare;
/// Run configuration.
pub mod config;
/// Event and frame discovery.
pub mod discovery;
/// Descriptor localization.
pub mod localize;
/// Parallel job execution.
pub mod orchestrate;
/// External renderer invocation.
pub mod render;
/// Comparison reports.
pub mod report;
/// Phase sequencing.
pub mod session;

pub use crate::foundation::core::{
    ALPHA_IMAGES_DIR, COMPARE_RESULT_XML, DIFF_IMAGES_DIR, FrameSpan, RESULTS_DIR, Resolution,
    TEST_SETS_DIR, TEST_SETS_RESULTS_DIR, VERSION_SEPARATOR, VersionPair, mirror_to_results,
};
pub use crate::foundation::error::{TesterError, TesterResult};

pub use crate::compare::engine::{ComparisonEngine, FrameMetric, SequenceComparison};
pub use crate::compare::runner::{ComparisonTask, compare_folder};
pub use crate::config::tester::{DEFAULT_INI_NAME, TesterConfig};
pub use crate::discovery::resolver::{DiscoverySession, EventUnit, FrameCatalog, FrameUnit};
pub use crate::orchestrate::pool::{DEFAULT_MAX_WORKERS, Job, RunStats, TaskOrchestrator};
pub use crate::render::runner::RenderTask;
pub use crate::report::xml::{ComparisonReport, EventMeta};
pub use crate::session::pipeline::{Phase, PhaseSummary, SessionOpts, TesterSession};
