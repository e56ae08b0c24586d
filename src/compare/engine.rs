use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::GenericImageView as _;

use crate::compare::artifacts::FrameArtifacts;
use crate::compare::metrics;
use crate::foundation::core::pad_frame;
use crate::foundation::error::{TesterError, TesterResult};

/// Similarity of one compared frame pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameMetric {
    /// Frame number (start frame + position in the sequence).
    pub frame_index: u32,
    /// Mean squared luminance error.
    pub mse: f64,
    /// Structural similarity of the luminance pair.
    pub ssim: f64,
}

/// Outcome of comparing two aligned image sequences.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SequenceComparison {
    /// Frame number parsed from the first original image.
    pub start_frame: u32,
    /// Number of index positions in the sequences.
    pub frame_count: usize,
    /// One entry per successfully compared position, in order.
    pub metrics: Vec<FrameMetric>,
    /// Positions that could not be compared.
    pub failed: usize,
}

impl SequenceComparison {
    /// Last frame number of the sequence (inclusive); the start frame for an empty run.
    pub fn end_frame(&self) -> u32 {
        let len = u32::try_from(self.frame_count).unwrap_or(u32::MAX);
        self.start_frame.saturating_add(len.saturating_sub(1))
    }

    /// Number of successfully compared positions.
    pub fn succeeded(&self) -> usize {
        self.metrics.len()
    }

    /// Smallest SSIM over the run.
    pub fn min_ssim(&self) -> Option<f64> {
        self.metrics.iter().map(|m| m.ssim).reduce(f64::min)
    }

    /// Largest SSIM over the run.
    pub fn max_ssim(&self) -> Option<f64> {
        self.metrics.iter().map(|m| m.ssim).reduce(f64::max)
    }
}

/// Frame number encoded in an image file name: the text before the first `.`.
pub fn frame_number_of(path: &Path) -> TesterResult<u32> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.split('.').next().unwrap_or_default();
    stem.parse::<u32>().map_err(|_| {
        TesterError::compare(format!(
            "cannot read a frame number from '{}'",
            path.display()
        ))
    })
}

/// Require `images[i]` to be numbered `start + i` for every position.
pub fn check_contiguous(images: &[PathBuf], start: u32) -> TesterResult<()> {
    for (pos, path) in images.iter().enumerate() {
        let expected = u32::try_from(pos)
            .ok()
            .and_then(|p| start.checked_add(p))
            .ok_or_else(|| TesterError::validation("frame sequence too long"))?;
        let found = frame_number_of(path)?;
        if found != expected {
            return Err(TesterError::validation(format!(
                "frame sequence is not contiguous: expected frame {expected}, found '{}'",
                path.display()
            )));
        }
    }
    Ok(())
}

/// How often (in frames) sequence progress is logged.
pub fn progress_interval(total: usize) -> usize {
    (total / 10).clamp(1, 10)
}

/// Compares aligned image sequences and writes per-frame diff/alpha images.
#[derive(Clone, Debug)]
pub struct ComparisonEngine {
    diff_dir: PathBuf,
    alpha_dir: PathBuf,
}

impl ComparisonEngine {
    /// Engine writing diff images to `diff_dir` and alpha images to `alpha_dir`.
    pub fn new(diff_dir: impl Into<PathBuf>, alpha_dir: impl Into<PathBuf>) -> Self {
        Self {
            diff_dir: diff_dir.into(),
            alpha_dir: alpha_dir.into(),
        }
    }

    /// Folder receiving diff images.
    pub fn diff_dir(&self) -> &Path {
        &self.diff_dir
    }

    /// Folder receiving alpha images.
    pub fn alpha_dir(&self) -> &Path {
        &self.alpha_dir
    }

    /// Compare one image pair and return `(mse, ssim, artifacts)`.
    pub fn compare_pair(
        &self,
        orig: &Path,
        tester: &Path,
    ) -> TesterResult<(f64, f64, FrameArtifacts)> {
        let a = image::open(orig).with_context(|| format!("load '{}'", orig.display()))?;
        let b = image::open(tester).with_context(|| format!("load '{}'", tester.display()))?;
        if a.dimensions() != b.dimensions() {
            let ((aw, ah), (bw, bh)) = (a.dimensions(), b.dimensions());
            return Err(TesterError::compare(format!(
                "dimension mismatch: {aw}x{ah} vs {bw}x{bh}"
            )));
        }

        let (ga, gb) = (a.to_luma8(), b.to_luma8());
        let mse = metrics::mse(&ga, &gb)?;
        let ssim = metrics::ssim(&ga, &gb)?;
        let artifacts = FrameArtifacts::from_difference(&metrics::abs_diff(&ga, &gb)?);
        Ok((mse, ssim, artifacts))
    }

    /// Compare two equal-length, name-sorted sequences position by position.
    ///
    /// A pair that fails to load or differs in size is counted in
    /// [`SequenceComparison::failed`] and the run continues. Artifact write failures are
    /// logged; the frame's metrics are kept.
    #[tracing::instrument(skip_all, fields(frames = orig.len()))]
    pub fn compare_sequences(
        &self,
        orig: &[PathBuf],
        tester: &[PathBuf],
    ) -> TesterResult<SequenceComparison> {
        if orig.is_empty() || tester.is_empty() {
            return Err(TesterError::compare("empty image sequence"));
        }
        if orig.len() != tester.len() {
            return Err(TesterError::compare(format!(
                "image count mismatch: {} vs {}",
                orig.len(),
                tester.len()
            )));
        }

        let start_frame = frame_number_of(&orig[0])?;
        check_contiguous(orig, start_frame)?;

        let total = orig.len();
        let interval = progress_interval(total);
        let mut out = SequenceComparison {
            start_frame,
            frame_count: total,
            ..SequenceComparison::default()
        };
        tracing::info!(total, "comparing frames");

        for (i, (a, b)) in orig.iter().zip(tester).enumerate() {
            if i % interval == 0 || i + 1 == total {
                tracing::info!(
                    "progress: {}/{} frames ({}%)",
                    i + 1,
                    total,
                    (i + 1) * 100 / total
                );
            }

            let (mse, ssim, artifacts) = match self.compare_pair(a, b) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(index = i, orig = %a.display(), "skipping frame: {e}");
                    out.failed += 1;
                    continue;
                }
            };

            // bounded by check_contiguous
            let frame_index = start_frame + i as u32;
            let counter = pad_frame(frame_index);
            let diff_path = self.diff_dir.join(format!("{counter}.jpg"));
            let alpha_path = self.alpha_dir.join(format!("{counter}.png"));
            if let Err(e) = artifacts.save(&diff_path, &alpha_path) {
                tracing::warn!(frame = frame_index, "{e}");
            }

            out.metrics.push(FrameMetric {
                frame_index,
                mse,
                ssim,
            });
        }

        tracing::info!(
            "frame comparison completed: {}/{} frames processed successfully",
            out.succeeded(),
            total
        );
        if out.failed > 0 {
            tracing::warn!(failed = out.failed, total, "some frames could not be compared");
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compare/engine.rs"]
mod tests;
