use std::fmt;
use std::path::{Path, PathBuf};

use crate::foundation::error::{TesterError, TesterResult};

/// Name of the source asset tree root segment.
pub const TEST_SETS_DIR: &str = "testSets";
/// Name of the mirrored results tree root segment.
pub const TEST_SETS_RESULTS_DIR: &str = "testSets_results";
/// Per-frame results folder written by the compare phase.
pub const RESULTS_DIR: &str = "results";
/// Diff image folder below [`RESULTS_DIR`].
pub const DIFF_IMAGES_DIR: &str = "diff_images";
/// Alpha image folder below [`RESULTS_DIR`].
pub const ALPHA_IMAGES_DIR: &str = "alpha_images";
/// Report file name below [`RESULTS_DIR`].
pub const COMPARE_RESULT_XML: &str = "compareResult.xml";
/// Separator between the two names of a version pair string.
pub const VERSION_SEPARATOR: &str = "_VS_";

/// The (original, tester) renderer build names being compared.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VersionPair {
    /// Baseline build name.
    pub orig: String,
    /// Build under test.
    pub tester: String,
}

impl VersionPair {
    /// Parse `"<orig>_VS_<tester>"`.
    ///
    /// Exactly one separator occurrence is accepted; both sides must be non-empty.
    pub fn parse(s: &str) -> TesterResult<Self> {
        let parts: Vec<&str> = s.split(VERSION_SEPARATOR).collect();
        let [orig, tester] = parts.as_slice() else {
            return Err(TesterError::validation(format!(
                "invalid version format: expected 'version1{VERSION_SEPARATOR}version2', got '{s}'"
            )));
        };
        if orig.is_empty() || tester.is_empty() {
            return Err(TesterError::validation(format!(
                "invalid version format: empty version name in '{s}'"
            )));
        }
        Ok(Self {
            orig: (*orig).to_string(),
            tester: (*tester).to_string(),
        })
    }

    /// The combined string used as a folder name in both trees.
    pub fn joined(&self) -> String {
        format!("{}{VERSION_SEPARATOR}{}", self.orig, self.tester)
    }
}

impl fmt::Display for VersionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Output image size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Create a validated, non-zero resolution.
    pub fn new(width: u32, height: u32) -> TesterResult<Self> {
        if width == 0 || height == 0 {
            return Err(TesterError::validation(
                "resolution width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Inclusive frame range `[start, end]` handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSpan {
    /// First rendered frame.
    pub start: u32,
    /// Last rendered frame (inclusive).
    pub end: u32,
}

impl FrameSpan {
    /// Create a validated span with `start <= end`.
    pub fn new(start: u32, end: u32) -> TesterResult<Self> {
        if start > end {
            return Err(TesterError::validation(format!(
                "frame span start ({start}) must be <= end ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Number of frames contained in the span.
    pub fn len_frames(self) -> u32 {
        self.end - self.start + 1
    }
}

/// Render `path` with forward slashes only.
pub fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Map a source-tree path to its mirror in the results tree.
///
/// Every occurrence of [`TEST_SETS_DIR`] in the path text is replaced.
pub fn mirror_to_results(path: &Path) -> PathBuf {
    PathBuf::from(slash_path(path).replace(TEST_SETS_DIR, TEST_SETS_RESULTS_DIR))
}

/// Zero-pad a frame number to four digits.
pub fn pad_frame(n: u32) -> String {
    format!("{n:04}")
}

/// Base name of `path` as an owned string (empty when there is none).
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
