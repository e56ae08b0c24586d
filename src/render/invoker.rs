use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::foundation::core::{FrameSpan, Resolution};
use crate::foundation::error::{TesterError, TesterResult};

/// Renderer executable file name inside a version folder.
pub const RENDERER_EXE: &str = "freedview.exe";
/// Output path template handed to the renderer inside the output folder.
pub const OUTPUT_IMAGE_TEMPLATE: &str = "wauwStills_F.jpg";
/// Fixed `-clusterSize` argument.
pub const CLUSTER_SIZE: &str = "12";
/// Fixed `-vidExportCameraName` argument.
pub const VIDEO_EXPORT_CAMERA_NAME: &str = "renderCAM_NEWShape";

/// One synchronous renderer invocation.
#[derive(Clone, Debug)]
pub struct RenderInvocation {
    /// Folder holding the renderer executable; also the working directory.
    pub renderer_dir: PathBuf,
    /// Localized descriptor passed as the first argument.
    pub descriptor: PathBuf,
    /// Output image size.
    pub resolution: Resolution,
    /// Folder receiving the rendered images (recreated empty before the run).
    pub output_dir: PathBuf,
    /// Inclusive frame range to render.
    pub frames: FrameSpan,
}

impl RenderInvocation {
    /// Full path of the renderer executable.
    pub fn executable(&self) -> PathBuf {
        self.renderer_dir.join(RENDERER_EXE)
    }

    /// Argument vector in the renderer's fixed layout.
    pub fn args(&self) -> Vec<OsString> {
        vec![
            self.descriptor.clone().into_os_string(),
            "-exportVideo".into(),
            "-imageSize".into(),
            self.resolution.to_string().into(),
            "-videoOutputPath".into(),
            self.output_dir.join(OUTPUT_IMAGE_TEMPLATE).into_os_string(),
            "-clusterSize".into(),
            CLUSTER_SIZE.into(),
            "-startFrame".into(),
            self.frames.start.to_string().into(),
            "-endFrame".into(),
            self.frames.end.to_string().into(),
            "-vidExportCameraName".into(),
            VIDEO_EXPORT_CAMERA_NAME.into(),
        ]
    }

    /// Render into a clean output folder, then normalize the produced file names.
    ///
    /// Returns the number of renamed images.
    #[tracing::instrument(skip(self), fields(descriptor = %self.descriptor.display()))]
    pub fn run(&self) -> TesterResult<usize> {
        reset_dir(&self.output_dir)?;

        let exe = self.executable();
        if !exe.is_file() {
            return Err(TesterError::render(format!(
                "renderer executable not found: {}",
                exe.display()
            )));
        }

        tracing::debug!(exe = %exe.display(), args = ?self.args(), "spawning renderer");
        let output = Command::new(&exe)
            .args(self.args())
            .current_dir(&self.renderer_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                TesterError::render(format!("failed to spawn '{}': {e}", exe.display()))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TesterError::render(format!(
                "renderer exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        normalize_output_names(&self.output_dir)
    }
}

/// Delete `dir` if present and recreate it empty.
pub fn reset_dir(dir: &Path) -> TesterResult<()> {
    if dir.exists() {
        tracing::debug!(dir = %dir.display(), "removing stale output");
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("remove output folder '{}'", dir.display()))?;
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create output folder '{}'", dir.display()))?;
    Ok(())
}

/// Last run of ASCII digits in `name`.
pub fn last_digit_run(name: &str) -> Option<&str> {
    let end = name.rfind(|c: char| c.is_ascii_digit())? + 1;
    let len = name[..end]
        .bytes()
        .rev()
        .take_while(u8::is_ascii_digit)
        .count();
    Some(&name[end - len..end])
}

/// Rename every file in `dir` to `<digits>.jpg`, keeping the renderer's zero padding.
///
/// Files without digits are left alone; a target already occupied by another file is
/// not overwritten. Returns the number of renamed files.
pub fn normalize_output_names(dir: &Path) -> TesterResult<usize> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("read '{}'", dir.display()))? {
        let path = entry
            .with_context(|| format!("read entry in '{}'", dir.display()))?
            .path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    let mut renamed = 0usize;
    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(digits) = last_digit_run(&name) else {
            continue;
        };
        let target = dir.join(format!("{digits}.jpg"));
        if target == path {
            continue;
        }
        if target.exists() {
            tracing::warn!(
                from = %path.display(),
                to = %target.display(),
                "rename target already exists, leaving file as is"
            );
            continue;
        }
        std::fs::rename(&path, &target)
            .with_context(|| format!("rename '{}'", path.display()))?;
        renamed += 1;
    }
    tracing::debug!(renamed, dir = %dir.display(), "normalized render output names");
    Ok(renamed)
}

#[cfg(test)]
#[path = "../../tests/unit/render/invoker.rs"]
mod tests;
