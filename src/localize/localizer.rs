use std::path::PathBuf;

use anyhow::Context as _;

use crate::discovery::resolver::{FrameCatalog, FrameUnit};
use crate::foundation::core::{base_name, slash_path};
use crate::foundation::error::{TesterError, TesterResult};

/// Folder segment that anchors authoring-time asset references.
pub const AUTHORING_EVENTS_DIR: &str = "Events";

/// Counters for one localization pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocalizeStats {
    /// Frames in the catalog.
    pub total: usize,
    /// Localized descriptors written.
    pub written: usize,
    /// Frames skipped because of a read or write failure.
    pub skipped: usize,
}

/// Authoring-time reference for a frame's set: `<root>/Events/<eventName>/<setName>`.
///
/// `<root>` is the first `/`-separated segment of the frame path, such as a drive `C:`.
/// Absolute Unix paths have an empty first segment and yield `Events/<eventName>/<setName>`
/// with no leading slash.
pub fn authoring_set_reference(frame: &FrameUnit) -> String {
    let frame_path = slash_path(&frame.frame_path);
    let root = frame_path.split('/').next().unwrap_or_default();
    let tail = format!(
        "{AUTHORING_EVENTS_DIR}/{}/{}",
        base_name(&frame.event.path),
        frame.set_name()
    );
    if root.is_empty() {
        tail
    } else {
        format!("{root}/{tail}")
    }
}

/// Local replacement for [`authoring_set_reference`]: `<eventPath>/<setName>`.
pub fn local_set_reference(frame: &FrameUnit) -> String {
    slash_path(&frame.event.path.join(frame.set_name()))
}

/// Replace every occurrence of `from` with `to` in descriptor text.
///
/// This is plain substring replacement; unrelated text containing `from` is rewritten too.
pub fn rewrite_descriptor(text: &str, from: &str, to: &str) -> String {
    text.replace(from, to)
}

/// Write the localized descriptor for one frame and return its path.
///
/// The authoring descriptor is left untouched.
pub fn localize_frame(frame: &FrameUnit) -> TesterResult<PathBuf> {
    let src = &frame.descriptor_file_path;
    if !src.is_file() {
        return Err(TesterError::skipped(format!(
            "descriptor '{}' does not exist",
            src.display()
        )));
    }

    let text = std::fs::read_to_string(src)
        .with_context(|| format!("read descriptor '{}'", src.display()))?;
    let localized = rewrite_descriptor(
        &text,
        &authoring_set_reference(frame),
        &local_set_reference(frame),
    );

    let dst = frame.localized_descriptor_path();
    std::fs::write(&dst, localized)
        .with_context(|| format!("write localized descriptor '{}'", dst.display()))?;
    tracing::debug!(descriptor = %dst.display(), "localized descriptor written");
    Ok(dst)
}

/// Localize every frame in `catalog`, continuing past individual failures.
#[tracing::instrument(skip(catalog), fields(frames = catalog.frames.len()))]
pub fn localize_catalog(catalog: &FrameCatalog) -> LocalizeStats {
    let mut stats = LocalizeStats {
        total: catalog.frames.len(),
        ..LocalizeStats::default()
    };

    for frame in &catalog.frames {
        match localize_frame(frame) {
            Ok(_) => stats.written += 1,
            Err(e) => {
                stats.skipped += 1;
                if e.is_skip() {
                    tracing::warn!(frame = %frame.frame_path.display(), "{e}");
                } else {
                    tracing::error!(frame = %frame.frame_path.display(), "localization failed: {e:#}");
                }
            }
        }
    }

    tracing::info!(
        "localize: {} succeeded, {} failed out of {}",
        stats.written,
        stats.skipped,
        stats.total
    );
    stats
}

#[cfg(test)]
#[path = "../../tests/unit/localize/localizer.rs"]
mod tests;
