use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{TesterError, TesterResult};

const DEFAULT_SECTION: &str = "DEFAULT";

/// A parsed INI document supporting key lookup across all sections.
///
/// Keys are case-insensitive; values are kept verbatim apart from surrounding whitespace.
#[derive(Clone, Debug, Default)]
pub struct IniFile {
    sections: Vec<IniSection>,
    defaults: Vec<(String, String)>,
}

#[derive(Clone, Debug)]
struct IniSection {
    name: String,
    entries: Vec<(String, String)>,
}

impl IniFile {
    /// Read and parse the INI file at `path`.
    pub fn load(path: &Path) -> TesterResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read ini file '{}'", path.display()))?;
        Self::parse(&text).map_err(|e| match e {
            TesterError::Config(msg) => {
                TesterError::config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Parse INI text.
    pub fn parse(text: &str) -> TesterResult<Self> {
        let mut out = Self::default();
        // `None` until the first header; `Some(None)` inside `[DEFAULT]`.
        let mut current: Option<Option<usize>> = None;

        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let Some(name) = rest.strip_suffix(']') else {
                    return Err(TesterError::config(format!(
                        "line {}: unterminated section header",
                        line_no + 1
                    )));
                };
                let name = name.trim();
                if name == DEFAULT_SECTION {
                    current = Some(None);
                } else {
                    out.sections.push(IniSection {
                        name: name.to_string(),
                        entries: Vec::new(),
                    });
                    current = Some(Some(out.sections.len() - 1));
                }
                continue;
            }

            let Some(split_at) = line.find(['=', ':']) else {
                return Err(TesterError::config(format!(
                    "line {}: expected 'key = value'",
                    line_no + 1
                )));
            };
            let key = line[..split_at].trim().to_ascii_lowercase();
            let value = line[split_at + 1..].trim().to_string();

            match current {
                None => {
                    return Err(TesterError::config(format!(
                        "line {}: key '{key}' appears before any section header",
                        line_no + 1
                    )));
                }
                Some(None) => out.defaults.push((key, value)),
                Some(Some(idx)) => out.sections[idx].entries.push((key, value)),
            }
        }

        Ok(out)
    }

    /// Section names in document order (excluding `[DEFAULT]`).
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// Every value stored under `key`, one per section that defines it.
    ///
    /// Falls back to `[DEFAULT]` when no named section defines the key.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        let key = key.to_ascii_lowercase();
        let found: Vec<&str> = self
            .sections
            .iter()
            .filter_map(|s| lookup(&s.entries, &key))
            .collect();
        if !found.is_empty() {
            return found;
        }
        lookup(&self.defaults, &key).into_iter().collect()
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).into_iter().next()
    }

    /// Like [`IniFile::get`], but every value must name an existing path.
    pub fn get_existing_path(&self, key: &str) -> TesterResult<&str> {
        let values = self.get_all(key);
        let Some(first) = values.first().copied() else {
            return Err(TesterError::config(format!("missing key '{key}'")));
        };
        if let Some(missing) = values.iter().find(|v| !Path::new(v).exists()) {
            return Err(TesterError::config(format!(
                "key '{key}' names a path that does not exist: {missing}"
            )));
        }
        Ok(first)
    }

    /// First value under `key`, or a configuration error naming the key.
    pub fn require(&self, key: &str) -> TesterResult<&str> {
        self.get(key)
            .ok_or_else(|| TesterError::config(format!("missing key '{key}'")))
    }
}

fn lookup<'a>(entries: &'a [(String, String)], key: &str) -> Option<&'a str> {
    // Later assignments in the same section win.
    entries
        .iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
#[path = "../../tests/unit/config/ini.rs"]
mod tests;
