use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::compare::engine::{ComparisonEngine, SequenceComparison};
use crate::discovery::resolver::{FrameCatalog, FrameUnit, sorted_subdirs};
use crate::foundation::core::{
    ALPHA_IMAGES_DIR, DIFF_IMAGES_DIR, RESULTS_DIR, VersionPair, base_name, mirror_to_results,
    slash_path,
};
use crate::foundation::error::{TesterError, TesterResult};
use crate::orchestrate::pool::{Job, RunStats, TaskOrchestrator};
use crate::report::xml::{ComparisonReport, EventMeta, ReportPaths};

/// Image extensions picked up from rendered version folders.
pub const RENDERED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
/// Image extensions picked up by [`compare_folder`].
pub const AD_HOC_IMAGE_EXTENSIONS: &[&str] = &["jpg", "png"];

/// Files in `dir` whose extension is one of `extensions` (case-insensitive), sorted by name.
pub fn collect_images(dir: &Path, extensions: &[&str]) -> TesterResult<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("read '{}'", dir.display()))? {
        let path = entry
            .with_context(|| format!("read entry in '{}'", dir.display()))?
            .path();
        let wanted = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|e| extensions.contains(&e.as_str()));
        if wanted && path.is_file() {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Two aligned image sequences to compare, plus where the results go.
#[derive(Clone, Debug)]
pub struct ComparisonTask {
    /// Original/tester build names.
    pub pair: VersionPair,
    /// Folder holding the original build's images.
    pub orig_dir: PathBuf,
    /// Folder holding the tester build's images.
    pub tester_dir: PathBuf,
    /// Original images, sorted by name.
    pub orig_images: Vec<PathBuf>,
    /// Tester images, sorted by name.
    pub tester_images: Vec<PathBuf>,
    /// Folder receiving `diff_images/`, `alpha_images/` and the report.
    pub results_dir: PathBuf,
    /// Event naming for the report.
    pub meta: EventMeta,
}

impl ComparisonTask {
    /// Build the task for a rendered catalog frame.
    ///
    /// Returns a skip when the frame has not been rendered with both builds, when the
    /// image counts differ, or when there are fewer than two images.
    pub fn for_frame(frame: &FrameUnit, pair: &VersionPair) -> TesterResult<Self> {
        let version_root = mirror_to_results(&frame.frame_path).join(pair.joined());
        if !version_root.is_dir() {
            return Err(TesterError::skipped(format!(
                "no rendered output at '{}'",
                version_root.display()
            )));
        }

        let (mut orig_dir, mut tester_dir) = (None, None);
        for dir in sorted_subdirs(&version_root)? {
            match base_name(&dir).as_str() {
                RESULTS_DIR => {}
                name if name == pair.orig => orig_dir = Some(dir),
                name if name == pair.tester => tester_dir = Some(dir),
                _ => {}
            }
        }
        let (Some(orig_dir), Some(tester_dir)) = (orig_dir, tester_dir) else {
            return Err(TesterError::skipped(format!(
                "rendered builds in '{}' do not match '{}'",
                version_root.display(),
                pair.joined()
            )));
        };

        let orig_images = collect_images(&orig_dir, RENDERED_IMAGE_EXTENSIONS)?;
        let tester_images = collect_images(&tester_dir, RENDERED_IMAGE_EXTENSIONS)?;
        if orig_images.len() != tester_images.len() {
            return Err(TesterError::skipped(format!(
                "frame count mismatch: {} in '{}' vs {} in '{}'",
                orig_images.len(),
                orig_dir.display(),
                tester_images.len(),
                tester_dir.display()
            )));
        }
        if orig_images.len() <= 1 {
            return Err(TesterError::skipped(format!(
                "no images to compare (found {})",
                orig_images.len()
            )));
        }

        Ok(Self {
            pair: pair.clone(),
            results_dir: version_root.join(RESULTS_DIR),
            meta: EventMeta::from_event(&frame.event),
            orig_dir,
            tester_dir,
            orig_images,
            tester_images,
        })
    }

    /// Compare every position, write the artifacts and the report.
    ///
    /// Returns the report path.
    pub fn execute(&self) -> TesterResult<PathBuf> {
        let diff_dir = self.results_dir.join(DIFF_IMAGES_DIR);
        let alpha_dir = self.results_dir.join(ALPHA_IMAGES_DIR);
        for dir in [&self.results_dir, &diff_dir, &alpha_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create '{}'", dir.display()))?;
        }

        let engine = ComparisonEngine::new(&diff_dir, &alpha_dir);
        let run: SequenceComparison =
            engine.compare_sequences(&self.orig_images, &self.tester_images)?;

        let paths = ReportPaths {
            source: &self.orig_dir,
            test: &self.tester_dir,
            diff: &diff_dir,
            alpha: &alpha_dir,
        };
        let report = ComparisonReport::build(
            &paths,
            &self.pair.orig,
            &self.pair.tester,
            self.meta.clone(),
            &run,
        )?;
        report.write(&self.results_dir)
    }
}

/// Comparison job for one catalog frame.
#[derive(Clone, Debug)]
pub struct CompareJob {
    frame: FrameUnit,
    pair: VersionPair,
}

impl Job for CompareJob {
    fn label(&self) -> String {
        format!("frame {}", slash_path(&self.frame.frame_path))
    }

    fn run(&self) -> TesterResult<()> {
        let task = ComparisonTask::for_frame(&self.frame, &self.pair)?;
        task.execute()?;
        Ok(())
    }
}

/// Compare the two builds' renders of every catalog frame.
#[tracing::instrument(skip(catalog), fields(frames = catalog.frames.len()))]
pub fn compare_catalog(
    catalog: &FrameCatalog,
    pair: &VersionPair,
    workers: usize,
) -> TesterResult<RunStats> {
    let jobs: Vec<CompareJob> = catalog
        .frames
        .iter()
        .map(|frame| CompareJob {
            frame: frame.clone(),
            pair: pair.clone(),
        })
        .collect();
    TaskOrchestrator::new("compare", workers)?.run(jobs)
}

/// Compare two image folders directly and write results under `<frame_folder>/results`.
///
/// Event naming is derived from `frame_folder`'s position below `testSets_results`.
#[tracing::instrument]
pub fn compare_folder(
    frame_folder: &Path,
    tester_dir: &Path,
    orig_dir: &Path,
    orig_name: &str,
    tester_name: &str,
) -> TesterResult<PathBuf> {
    for (what, path) in [
        ("frame folder", frame_folder),
        ("tester folder", tester_dir),
        ("orig folder", orig_dir),
    ] {
        if !path.exists() {
            return Err(TesterError::validation(format!(
                "{what} does not exist: {}",
                path.display()
            )));
        }
    }

    let results_dir = PathBuf::from(slash_path(&frame_folder.join(RESULTS_DIR)));
    let task = ComparisonTask {
        pair: VersionPair {
            orig: orig_name.to_string(),
            tester: tester_name.to_string(),
        },
        orig_dir: orig_dir.to_path_buf(),
        tester_dir: tester_dir.to_path_buf(),
        orig_images: collect_images(orig_dir, AD_HOC_IMAGE_EXTENSIONS)?,
        tester_images: collect_images(tester_dir, AD_HOC_IMAGE_EXTENSIONS)?,
        meta: EventMeta::from_results_path(&results_dir),
        results_dir,
    };
    task.execute()
}

#[cfg(test)]
#[path = "../../tests/unit/compare/runner.rs"]
mod tests;
