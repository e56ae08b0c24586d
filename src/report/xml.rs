use std::path::{Path, PathBuf};

use anyhow::Context as _;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::compare::engine::SequenceComparison;
use crate::discovery::resolver::EventUnit;
use crate::foundation::core::{COMPARE_RESULT_XML, TEST_SETS_RESULTS_DIR, pad_frame, slash_path};
use crate::foundation::error::{TesterError, TesterResult};

/// Event naming written into a report; absent levels are empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventMeta {
    /// Event folder name.
    pub event_name: String,
    /// Sport folder name.
    pub sport_type: String,
    /// Stadium folder name.
    pub stadium_name: String,
    /// Category folder name.
    pub category_name: String,
}

impl EventMeta {
    /// Naming of a discovered event.
    pub fn from_event(event: &EventUnit) -> Self {
        Self {
            event_name: event.event_name.clone(),
            sport_type: event.sport_type.clone().unwrap_or_default(),
            stadium_name: event.stadium_name.clone().unwrap_or_default(),
            category_name: event.category_name.clone().unwrap_or_default(),
        }
    }

    /// Derive naming from a `results` folder path below `testSets_results`.
    ///
    /// The number of path segments after `testSets_results` decides the layout:
    /// 5 is event only, 6 sport/event, 7 sport/stadium/event, 8 or more all four.
    /// Any other shape yields empty fields.
    pub fn from_results_path(path: &Path) -> Self {
        let text = slash_path(path);
        let Some((_, tail)) = text.split_once(TEST_SETS_RESULTS_DIR) else {
            tracing::debug!(path = %text, "no results root in path, metadata left empty");
            return Self::default();
        };
        let seg: Vec<&str> = tail.split('/').filter(|s| !s.is_empty()).collect();
        let owned = |i: usize| seg[i].to_string();
        match seg.len() {
            5 => Self {
                event_name: owned(0),
                ..Self::default()
            },
            6 => Self {
                sport_type: owned(0),
                event_name: owned(1),
                ..Self::default()
            },
            7 => Self {
                sport_type: owned(0),
                stadium_name: owned(1),
                event_name: owned(2),
                ..Self::default()
            },
            n if n >= 8 => Self {
                sport_type: owned(0),
                stadium_name: owned(1),
                category_name: owned(2),
                event_name: owned(3),
            },
            _ => Self::default(),
        }
    }
}

/// One `<frame>` entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReportFrame {
    /// Start frame plus position among compared frames.
    pub frame_index: u32,
    /// SSIM of the frame.
    pub value: f64,
}

/// Everything written to `compareResult.xml` for one comparison run.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonReport {
    /// Original-version image folder.
    pub source_path: String,
    /// Tester-version image folder.
    pub test_path: String,
    /// Diff image folder.
    pub diff_path: String,
    /// Alpha image folder.
    pub alpha_path: String,
    /// Original renderer build name.
    pub orig_version: String,
    /// Tester renderer build name.
    pub test_version: String,
    /// Event naming.
    pub meta: EventMeta,
    /// First frame number.
    pub start_frame: u32,
    /// Last frame number (start + sequence length - 1).
    pub end_frame: u32,
    /// Smallest SSIM.
    pub min_ssim: f64,
    /// Largest SSIM.
    pub max_ssim: f64,
    /// Per-frame SSIM values in order.
    pub frames: Vec<ReportFrame>,
}

/// Folder paths recorded in a report.
#[derive(Clone, Debug)]
pub struct ReportPaths<'a> {
    /// Original-version image folder.
    pub source: &'a Path,
    /// Tester-version image folder.
    pub test: &'a Path,
    /// Diff image folder.
    pub diff: &'a Path,
    /// Alpha image folder.
    pub alpha: &'a Path,
}

impl ComparisonReport {
    /// Assemble a report from a finished sequence comparison.
    ///
    /// Fails with a report error when no frame was compared successfully.
    pub fn build(
        paths: &ReportPaths<'_>,
        orig_version: &str,
        test_version: &str,
        meta: EventMeta,
        run: &SequenceComparison,
    ) -> TesterResult<Self> {
        let (Some(min_ssim), Some(max_ssim)) = (run.min_ssim(), run.max_ssim()) else {
            return Err(TesterError::report(
                "no frame was compared successfully, nothing to report",
            ));
        };
        let frames = (run.start_frame..)
            .zip(&run.metrics)
            .map(|(frame_index, m)| ReportFrame {
                frame_index,
                value: m.ssim,
            })
            .collect();
        Ok(Self {
            source_path: slash_path(paths.source),
            test_path: slash_path(paths.test),
            diff_path: slash_path(paths.diff),
            alpha_path: slash_path(paths.alpha),
            orig_version: orig_version.to_string(),
            test_version: test_version.to_string(),
            meta,
            start_frame: run.start_frame,
            end_frame: run.end_frame(),
            min_ssim,
            max_ssim,
            frames,
        })
    }

    /// Serialize as a tab-indented XML document.
    pub fn to_xml(&self) -> TesterResult<String> {
        let mut w = Writer::new_with_indent(Vec::new(), b'\t', 1);
        w.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .context("write xml declaration")?;
        w.write_event(Event::Start(BytesStart::new("root")))
            .context("open <root>")?;

        let fields = [
            ("sourcePath", self.source_path.clone()),
            ("testPath", self.test_path.clone()),
            ("diffPath", self.diff_path.clone()),
            ("alphaPath", self.alpha_path.clone()),
            ("origFreeDView", self.orig_version.clone()),
            ("testFreedview", self.test_version.clone()),
            ("eventName", self.meta.event_name.clone()),
            ("sportType", self.meta.sport_type.clone()),
            ("stadiumName", self.meta.stadium_name.clone()),
            ("categoryName", self.meta.category_name.clone()),
            ("startFrame", pad_frame(self.start_frame)),
            ("endFrame", pad_frame(self.end_frame)),
            ("minVal", format_float(self.min_ssim)),
            ("maxVal", format_float(self.max_ssim)),
        ];
        for (name, value) in &fields {
            write_text_element(&mut w, name, value)?;
        }

        w.write_event(Event::Start(BytesStart::new("frames")))
            .context("open <frames>")?;
        for frame in &self.frames {
            w.write_event(Event::Start(BytesStart::new("frame")))
                .context("open <frame>")?;
            write_text_element(&mut w, "frameIndex", &frame.frame_index.to_string())?;
            write_text_element(&mut w, "value", &format_float(frame.value))?;
            w.write_event(Event::End(BytesEnd::new("frame")))
                .context("close <frame>")?;
        }
        w.write_event(Event::End(BytesEnd::new("frames")))
            .context("close <frames>")?;
        w.write_event(Event::End(BytesEnd::new("root")))
            .context("close <root>")?;

        let mut text = String::from_utf8(w.into_inner()).context("report is not utf-8")?;
        text.push('\n');
        Ok(text)
    }

    /// Write `compareResult.xml` into `results_dir` and return its path.
    #[tracing::instrument(skip(self), fields(frames = self.frames.len()))]
    pub fn write(&self, results_dir: &Path) -> TesterResult<PathBuf> {
        let path = results_dir.join(COMPARE_RESULT_XML);
        let xml = self.to_xml()?;
        std::fs::write(&path, xml)
            .with_context(|| format!("write report '{}'", path.display()))?;
        tracing::info!(report = %path.display(), "report written");
        Ok(path)
    }
}

fn write_text_element(w: &mut Writer<Vec<u8>>, name: &str, value: &str) -> TesterResult<()> {
    w.write_event(Event::Start(BytesStart::new(name)))
        .with_context(|| format!("open <{name}>"))?;
    w.write_event(Event::Text(BytesText::new(value)))
        .with_context(|| format!("write <{name}> text"))?;
    w.write_event(Event::End(BytesEnd::new(name)))
        .with_context(|| format!("close <{name}>"))?;
    Ok(())
}

/// Shortest round-trip text of a float.
///
/// Decimal exponents in `[-4, 16)` print positionally, integral values keeping one
/// fractional digit (`1.0`); everything else prints as `<mantissa>e<sign><2+ digits>`
/// (`2.4e-05`, `1e+16`).
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let sci = format!("{v:e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    if (-4..16).contains(&exp) {
        if v.fract() == 0.0 {
            format!("{v:.1}")
        } else {
            format!("{v}")
        }
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/report/xml.rs"]
mod tests;
