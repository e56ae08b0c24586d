use std::path::{Path, PathBuf};

use crate::config::tester::{DescriptorFrames, read_camera_resolution};
use crate::discovery::resolver::{FrameCatalog, FrameUnit};
use crate::foundation::core::{FrameSpan, Resolution, VersionPair, base_name, mirror_to_results};
use crate::foundation::error::{TesterError, TesterResult};
use crate::orchestrate::pool::{Job, RunStats, TaskOrchestrator};
use crate::render::invoker::RenderInvocation;

/// One installed renderer build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RendererVersion {
    /// Build name (folder name).
    pub name: String,
    /// Folder holding the build's executable.
    pub path: PathBuf,
}

/// Locate the two builds of `pair` below `<root>/<orig>_VS_<tester>/`.
///
/// The original build comes first. Builds whose folder is missing are left out.
pub fn find_renderer_versions(root: &Path, pair: &VersionPair) -> Vec<RendererVersion> {
    let base = root.join(pair.joined());
    [&pair.orig, &pair.tester]
        .into_iter()
        .filter_map(|name| {
            let path = base.join(name);
            path.is_dir().then(|| RendererVersion {
                name: name.clone(),
                path,
            })
        })
        .collect()
}

/// Output folder for one (frame, version) render.
pub fn render_output_dir(frame: &FrameUnit, pair: &VersionPair, version_name: &str) -> PathBuf {
    mirror_to_results(&frame.frame_path)
        .join(pair.joined())
        .join(version_name)
}

/// A fully-resolved render of one frame with one renderer build.
#[derive(Clone, Debug)]
pub struct RenderTask {
    /// Renderer build folder.
    pub version_path: PathBuf,
    /// Renderer build name.
    pub version_name: String,
    /// Frame being rendered.
    pub frame: FrameUnit,
    /// Output image size from the frame's camera control INI.
    pub output_resolution: Resolution,
    /// Frame range from the descriptor.
    pub frame_range: FrameSpan,
    /// Folder receiving the rendered images.
    pub output_dir: PathBuf,
}

impl RenderTask {
    /// Resolve the camera resolution and frame range for `frame` rendered by `version`.
    pub fn resolve(
        version: &RendererVersion,
        frame: &FrameUnit,
        pair: &VersionPair,
    ) -> TesterResult<Self> {
        let output_resolution = read_camera_resolution(&frame.frame_path)?;
        let frame_range = DescriptorFrames::read(&frame.descriptor_file_path)?.span()?;
        Ok(Self {
            version_path: version.path.clone(),
            version_name: version.name.clone(),
            frame: frame.clone(),
            output_resolution,
            frame_range,
            output_dir: render_output_dir(frame, pair, &version.name),
        })
    }

    /// Invocation rendering the localized descriptor into [`RenderTask::output_dir`].
    pub fn invocation(&self) -> RenderInvocation {
        RenderInvocation {
            renderer_dir: self.version_path.clone(),
            descriptor: self.frame.localized_descriptor_path(),
            resolution: self.output_resolution,
            output_dir: self.output_dir.clone(),
            frames: self.frame_range,
        }
    }
}

/// Render job for one (version, frame) pair; inputs are resolved when the job runs.
#[derive(Clone, Debug)]
pub struct RenderJob {
    version: RendererVersion,
    frame: FrameUnit,
    pair: VersionPair,
}

impl Job for RenderJob {
    fn label(&self) -> String {
        format!(
            "version {}, frame {}",
            self.version.name,
            self.frame.frame_path.display()
        )
    }

    fn run(&self) -> TesterResult<()> {
        let task = RenderTask::resolve(&self.version, &self.frame, &self.pair)?;
        let renamed = task.invocation().run()?;
        tracing::debug!(
            version = %task.version_name,
            frame = %base_name(&task.frame.frame_path),
            renamed,
            "render finished"
        );
        Ok(())
    }
}

/// Render every catalog frame with both builds of `pair`.
#[tracing::instrument(skip(catalog), fields(frames = catalog.frames.len()))]
pub fn render_catalog(
    catalog: &FrameCatalog,
    renderer_root: &Path,
    pair: &VersionPair,
    workers: usize,
) -> TesterResult<RunStats> {
    let versions = find_renderer_versions(renderer_root, pair);
    if versions.is_empty() {
        return Err(TesterError::config(format!(
            "no renderer builds found in '{}' (expected '{}' and '{}')",
            renderer_root.join(pair.joined()).display(),
            pair.orig,
            pair.tester
        )));
    }
    tracing::info!(
        versions = %versions.iter().map(|v| v.name.as_str()).collect::<Vec<_>>().join(", "),
        "renderer builds found"
    );

    let jobs: Vec<RenderJob> = versions
        .iter()
        .flat_map(|version| {
            catalog.frames.iter().map(move |frame| RenderJob {
                version: version.clone(),
                frame: frame.clone(),
                pair: pair.clone(),
            })
        })
        .collect();

    TaskOrchestrator::new("render", workers)?.run(jobs)
}

#[cfg(test)]
#[path = "../../tests/unit/render/runner.rs"]
mod tests;
