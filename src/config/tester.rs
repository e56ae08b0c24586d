use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::config::ini::IniFile;
use crate::foundation::core::{FrameSpan, Resolution, VersionPair};
use crate::foundation::error::{TesterError, TesterResult};

/// Default INI file name looked up when no explicit path is given.
pub const DEFAULT_INI_NAME: &str = "freeDView_tester.ini";
/// Folder below each frame holding the camera INI backups.
pub const DYNAMIC_INIS_BACKUP: &str = "dynamicINIsBackup";
/// Camera control INI carrying the output resolution.
pub const CAMERA_CONTROL_INI: &str = "cameracontrol.ini";
/// Camera preset INI that must accompany the camera control INI.
pub const CAMPRESET_INI: &str = "campreset.ini";

/// Typed view of the run configuration INI.
#[derive(Clone, Debug)]
pub struct TesterConfig {
    /// Root of the source asset tree (`setTestPath`).
    pub set_test_path: PathBuf,
    /// Root holding renderer installations (`freedviewPath`).
    pub freedview_path: Option<PathBuf>,
    /// Raw version pair string (`freedviewVer`).
    pub freedview_ver: Option<String>,
    /// Wildcard event-name pattern (`eventName`).
    pub event_pattern: String,
    /// Set-name pattern (`setName`); carried for callers, not matched during discovery.
    pub set_pattern: String,
}

impl TesterConfig {
    /// Load the configuration from an INI file.
    pub fn load(path: &Path) -> TesterResult<Self> {
        let ini = IniFile::load(path)?;
        Self::from_ini(&ini)
    }

    /// Build the configuration from a parsed INI document.
    pub fn from_ini(ini: &IniFile) -> TesterResult<Self> {
        Ok(Self {
            set_test_path: PathBuf::from(ini.require("setTestPath")?),
            freedview_path: ini.get("freedviewPath").map(PathBuf::from),
            freedview_ver: ini.get("freedviewVer").map(str::to_string),
            event_pattern: ini.require("eventName")?.to_string(),
            set_pattern: ini.get("setName").unwrap_or_default().to_string(),
        })
    }

    /// Root folder of the renderer installations.
    pub fn renderer_root(&self) -> TesterResult<&Path> {
        self.freedview_path
            .as_deref()
            .ok_or_else(|| TesterError::config("missing key 'freedviewPath'"))
    }

    /// Parsed (original, tester) version pair.
    pub fn version_pair(&self) -> TesterResult<VersionPair> {
        let raw = self
            .freedview_ver
            .as_deref()
            .ok_or_else(|| TesterError::config("missing key 'freedviewVer'"))?;
        VersionPair::parse(raw)
    }
}

/// Read the render resolution from a frame's camera INI backups.
///
/// Both `cameracontrol.ini` and `campreset.ini` must exist below
/// `<frame>/dynamicINIsBackup`.
pub fn read_camera_resolution(frame_path: &Path) -> TesterResult<Resolution> {
    let backup = frame_path.join(DYNAMIC_INIS_BACKUP);
    let control = backup.join(CAMERA_CONTROL_INI);
    let preset = backup.join(CAMPRESET_INI);
    for required in [&control, &preset] {
        if !required.is_file() {
            return Err(TesterError::skipped(format!(
                "'{}' is missing",
                required.display()
            )));
        }
    }

    let ini = IniFile::load(&control)?;
    let parse = |key: &str| -> TesterResult<u32> {
        let raw = ini.require(key)?;
        raw.parse::<u32>().map_err(|_| {
            TesterError::config(format!(
                "invalid {key} '{raw}' in '{}'",
                control.display()
            ))
        })
    };
    Resolution::new(parse("outputWidth")?, parse("outputHeight")?)
}

/// Frame range fields of a render descriptor JSON file.
#[derive(Clone, Copy, Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorFrames {
    /// First frame to render.
    pub start_frame: u32,
    /// Last frame to render (inclusive).
    pub end_frame: u32,
}

impl DescriptorFrames {
    /// Read `startFrame`/`endFrame` from a descriptor file; other fields are ignored.
    pub fn read(path: &Path) -> TesterResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read descriptor '{}'", path.display()))?;
        let frames: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse descriptor '{}'", path.display()))?;
        Ok(frames)
    }

    /// The validated inclusive span.
    pub fn span(self) -> TesterResult<FrameSpan> {
        FrameSpan::new(self.start_frame, self.end_frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/tester.rs"]
mod tests;
