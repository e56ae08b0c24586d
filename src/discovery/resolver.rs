use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::discovery::pattern::{is_event, parse_frame_name};
use crate::foundation::core::base_name;
use crate::foundation::error::TesterResult;

/// Deepest folder level (relative to the asset root) at which an event may live.
pub const MAX_EVENT_DEPTH: usize = 4;
/// Descriptor folder, relative to a frame folder.
pub const DESCRIPTOR_DIR: [&str; 2] = ["Render", "Json"];
/// Authoring-time descriptor file name.
pub const DESCRIPTOR_FILE: &str = "standAloneRender.json";
/// Localized descriptor file name written next to [`DESCRIPTOR_FILE`].
pub const LOCALIZED_DESCRIPTOR_FILE: &str = "testMe.json";

const SPORT_PLACEHOLDER: &str = "sportType";
const STADIUM_PLACEHOLDER: &str = "stadiumName";
const CATEGORY_PLACEHOLDER: &str = "categoryName";

/// Fully-resolved location of one test event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventUnit {
    /// Event folder path.
    pub path: PathBuf,
    /// Sport folder name, when the event sits below one.
    pub sport_type: Option<String>,
    /// Stadium folder name, when present.
    pub stadium_name: Option<String>,
    /// Category folder name, when present.
    pub category_name: Option<String>,
    /// Event folder base name.
    pub event_name: String,
}

/// One renderable `F<number>` frame folder and its descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameUnit {
    /// Set folder containing the frame.
    pub set_path: PathBuf,
    /// Frame folder path.
    pub frame_path: PathBuf,
    /// Frame folder base name (`F<digits>`).
    pub frame_name: String,
    /// Number parsed from the frame folder name.
    pub frame_number: i64,
    /// Folder holding the descriptor files.
    pub descriptor_folder: PathBuf,
    /// Authoring-time descriptor file (exists at discovery time).
    pub descriptor_file_path: PathBuf,
    /// Event the frame belongs to.
    pub event: EventUnit,
}

impl FrameUnit {
    /// Base name of the frame's set folder.
    pub fn set_name(&self) -> String {
        base_name(&self.set_path)
    }

    /// Path of the localized descriptor sibling.
    pub fn localized_descriptor_path(&self) -> PathBuf {
        self.descriptor_folder.join(LOCALIZED_DESCRIPTOR_FILE)
    }
}

/// Flat result of one discovery pass.
#[derive(Clone, Debug, Default)]
pub struct FrameCatalog {
    /// Every resolved event, in traversal order.
    pub events: Vec<EventUnit>,
    /// Every qualifying frame below those events.
    pub frames: Vec<FrameUnit>,
}

impl FrameCatalog {
    /// Return `true` when no frame was discovered.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// One discovery pass over an asset root.
///
/// Owns the disambiguation counters used when synthesizing placeholder folders; they are
/// reset at the start of every [`DiscoverySession::discover`] call.
#[derive(Debug)]
pub struct DiscoverySession {
    root: PathBuf,
    event_pattern: String,
    create_folders: bool,
    sport_index: u32,
    stadium_index: u32,
}

impl DiscoverySession {
    /// Create a read-only session.
    pub fn new(root: impl Into<PathBuf>, event_pattern: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            event_pattern: event_pattern.into(),
            create_folders: false,
            sport_index: 1,
            stadium_index: 1,
        }
    }

    /// Enable or disable placeholder folder synthesis for shallow events.
    pub fn with_folder_creation(mut self, enabled: bool) -> Self {
        self.create_folders = enabled;
        self
    }

    /// Walk the asset root and return every event and frame found below it.
    ///
    /// A missing root is logged and yields an empty catalog.
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    pub fn discover(&mut self) -> TesterResult<FrameCatalog> {
        self.sport_index = 1;
        self.stadium_index = 1;

        if !self.root.is_dir() {
            tracing::warn!("asset root does not exist");
            return Ok(FrameCatalog::default());
        }

        let mut events = Vec::new();
        let root = self.root.clone();
        let top = sorted_subdirs(&root)?;
        for dir in top {
            self.stadium_index = 1;
            let mut ancestors = Vec::new();
            self.visit(&dir, 1, &mut ancestors, &mut events)?;
        }

        let mut seen = BTreeSet::new();
        events.retain(|e: &EventUnit| seen.insert(e.path.clone()));

        let mut frames = Vec::new();
        for event in &events {
            collect_frames(event, &mut frames);
        }

        if frames.is_empty() {
            tracing::warn!(events = events.len(), "no frame folders discovered");
        } else {
            tracing::info!(
                events = events.len(),
                frames = frames.len(),
                "discovery finished"
            );
        }
        Ok(FrameCatalog { events, frames })
    }

    fn visit(
        &mut self,
        dir: &Path,
        depth: usize,
        ancestors: &mut Vec<String>,
        events: &mut Vec<EventUnit>,
    ) -> TesterResult<()> {
        let name = base_name(dir);
        if is_event(&self.event_pattern, &name) {
            let event = if self.create_folders && depth < MAX_EVENT_DEPTH {
                self.synthesize_canonical(dir, &name, ancestors)?
            } else {
                event_from_ancestors(dir, &name, ancestors)
            };
            tracing::debug!(event = %event.path.display(), depth, "event found");
            events.push(event);
            return Ok(());
        }

        if depth >= MAX_EVENT_DEPTH {
            return Ok(());
        }

        let children = match sorted_subdirs(dir) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), "cannot list folder: {e}");
                return Ok(());
            }
        };
        ancestors.push(name);
        for child in children {
            self.visit(&child, depth + 1, ancestors, events)?;
        }
        ancestors.pop();
        Ok(())
    }

    /// Create the missing levels above a shallow event and return the canonical event path.
    ///
    /// An existing placeholder that already holds this event is reused, so repeated passes
    /// do not grow new placeholder trees.
    fn synthesize_canonical(
        &mut self,
        event_dir: &Path,
        event_name: &str,
        ancestors: &[String],
    ) -> TesterResult<EventUnit> {
        let parent = event_dir.parent().unwrap_or(&self.root).to_path_buf();

        let (category_dir, sport, stadium) = match ancestors {
            [] => {
                let (k, dir) = claim_placeholder(
                    &parent,
                    SPORT_PLACEHOLDER,
                    &[STADIUM_PLACEHOLDER, CATEGORY_PLACEHOLDER],
                    event_name,
                    self.sport_index,
                );
                self.sport_index = k;
                (
                    dir,
                    format!("{SPORT_PLACEHOLDER}_{k}"),
                    STADIUM_PLACEHOLDER.to_string(),
                )
            }
            [sport] => {
                let (k, dir) = claim_placeholder(
                    &parent,
                    STADIUM_PLACEHOLDER,
                    &[CATEGORY_PLACEHOLDER],
                    event_name,
                    self.stadium_index,
                );
                self.stadium_index = k;
                (dir, sport.clone(), format!("{STADIUM_PLACEHOLDER}_{k}"))
            }
            [sport, stadium, ..] => (
                parent.join(CATEGORY_PLACEHOLDER),
                sport.clone(),
                stadium.clone(),
            ),
        };

        let path = category_dir.join(event_name);
        std::fs::create_dir_all(&path)
            .with_context(|| format!("create placeholder event folder '{}'", path.display()))?;
        tracing::info!(from = %event_dir.display(), to = %path.display(), "synthesized event path");

        Ok(EventUnit {
            path,
            sport_type: Some(sport),
            stadium_name: Some(stadium),
            category_name: Some(CATEGORY_PLACEHOLDER.to_string()),
            event_name: event_name.to_string(),
        })
    }
}

/// Find `<parent>/<prefix>_<k>/<tail...>` for the smallest usable `k >= start`.
///
/// A candidate is usable when it already holds `event_name` or does not exist yet.
fn claim_placeholder(
    parent: &Path,
    prefix: &str,
    tail: &[&str],
    event_name: &str,
    start: u32,
) -> (u32, PathBuf) {
    let mut k = start;
    loop {
        let mut candidate = parent.join(format!("{prefix}_{k}"));
        for seg in tail {
            candidate.push(seg);
        }
        if candidate.join(event_name).exists() || !candidate.exists() {
            return (k, candidate);
        }
        k += 1;
    }
}

fn event_from_ancestors(dir: &Path, name: &str, ancestors: &[String]) -> EventUnit {
    EventUnit {
        path: dir.to_path_buf(),
        sport_type: ancestors.first().cloned(),
        stadium_name: ancestors.get(1).cloned(),
        category_name: ancestors.get(2).cloned(),
        event_name: name.to_string(),
    }
}

fn collect_frames(event: &EventUnit, out: &mut Vec<FrameUnit>) {
    if !event.path.is_dir() {
        return;
    }
    let sets = match sorted_subdirs(&event.path) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(event = %event.path.display(), "cannot list sets: {e}");
            return;
        }
    };

    for set_path in sets {
        let frames = match sorted_subdirs(&set_path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(set = %set_path.display(), "cannot list frames: {e}");
                continue;
            }
        };
        for frame_path in frames {
            let frame_name = base_name(&frame_path);
            let Some(frame_number) = parse_frame_name(&frame_name) else {
                continue;
            };
            let descriptor_folder = DESCRIPTOR_DIR
                .iter()
                .fold(frame_path.clone(), |p, seg| p.join(seg));
            let descriptor_file_path = descriptor_folder.join(DESCRIPTOR_FILE);
            if !descriptor_file_path.is_file() {
                tracing::debug!(frame = %frame_path.display(), "no descriptor, frame excluded");
                continue;
            }
            out.push(FrameUnit {
                set_path: set_path.clone(),
                frame_path,
                frame_name,
                frame_number,
                descriptor_folder,
                descriptor_file_path,
                event: event.clone(),
            });
        }
    }
}

/// Immediate subdirectories of `dir`, sorted by name.
pub(crate) fn sorted_subdirs(dir: &Path) -> TesterResult<Vec<PathBuf>> {
    let mut out = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read folder '{}'", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/discovery/resolver.rs"]
mod tests;
