//! Line-preserving INI documents (`ironic.conf`)
//!
//! Parses oslo.config style files:
//! ```ini
//! [DEFAULT]
//! auth_strategy = keystone
//!
//! [keystone_authtoken]
//! username = ironic
//! ```
//!
//! Comments, blank lines and the order of untouched entries survive a
//! parse/render cycle, so applying a handful of settings to an operator's
//! file produces a minimal diff.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{IronicError, Result};

/// Section that owns keys appearing before any header
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Parsed configuration: section -> key -> value
pub type ConfigSections = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// Blank line or comment, kept verbatim
    Other(String),
    Section {
        name: String,
        raw: String,
    },
    Entry {
        section: String,
        key: String,
        value: String,
        /// Original text; `None` once the entry has been rewritten
        raw: Option<String>,
    },
}

/// An INI file held as a sequence of lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    lines: Vec<Line>,
}

impl IniDocument {
    /// Parse INI text
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = Vec::new();
        let mut current = DEFAULT_SECTION.to_string();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                lines.push(Line::Other(raw.to_string()));
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix('[') {
                let name = rest
                    .strip_suffix(']')
                    .ok_or_else(|| IronicError::ini_parse(line_no, "unterminated section header"))?
                    .trim();
                if name.is_empty() {
                    return Err(IronicError::ini_parse(line_no, "empty section name"));
                }
                current = name.to_string();
                lines.push(Line::Section {
                    name: current.clone(),
                    raw: raw.to_string(),
                });
                continue;
            }

            let (key, value) = trimmed
                .split_once('=')
                .ok_or_else(|| IronicError::ini_parse(line_no, "expected 'key = value'"))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(IronicError::ini_parse(line_no, "empty key"));
            }

            lines.push(Line::Entry {
                section: current.clone(),
                key: key.to_string(),
                value: value.trim().to_string(),
                raw: Some(raw.to_string()),
            });
        }

        Ok(Self { lines })
    }

    /// Read and parse a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::parse(&text).map_err(|e| e.with_path(path))
    }

    /// Value of `section/key`; the last occurrence wins
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.lines.iter().rev().find_map(|line| match line {
            Line::Entry {
                section: s,
                key: k,
                value,
                ..
            } if s == section && k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Set `section/key`, updating every occurrence in place or inserting a
    /// new entry at the end of the section (creating it if needed)
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let mut found = false;
        for line in &mut self.lines {
            if let Line::Entry {
                section: s,
                key: k,
                value: v,
                raw,
            } = line
            {
                if s == section && k == key {
                    found = true;
                    if v != value {
                        *v = value.to_string();
                        *raw = None;
                    }
                }
            }
        }
        if found {
            return;
        }

        let entry = Line::Entry {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            raw: None,
        };

        match self.last_index_of_section(section) {
            Some(idx) => self.lines.insert(idx + 1, entry),
            None => {
                if matches!(self.lines.last(), Some(Line::Other(s)) if !s.trim().is_empty())
                    || matches!(self.lines.last(), Some(Line::Section { .. } | Line::Entry { .. }))
                {
                    self.lines.push(Line::Other(String::new()));
                }
                self.lines.push(Line::Section {
                    name: section.to_string(),
                    raw: format!("[{}]", section),
                });
                self.lines.push(entry);
            }
        }
    }

    /// Remove every occurrence of `section/key`, returning the last value
    pub fn remove(&mut self, section: &str, key: &str) -> Option<String> {
        let mut removed = None;
        self.lines.retain(|line| match line {
            Line::Entry {
                section: s,
                key: k,
                value,
                ..
            } if s == section && k == key => {
                removed = Some(value.clone());
                false
            }
            _ => true,
        });
        removed
    }

    /// All `(section, key)` pairs in document order, duplicates collapsed
    pub fn keys(&self) -> Vec<(String, String)> {
        let mut seen = Vec::new();
        for line in &self.lines {
            if let Line::Entry { section, key, .. } = line {
                let pair = (section.clone(), key.clone());
                if !seen.contains(&pair) {
                    seen.push(pair);
                }
            }
        }
        seen
    }

    /// Section/key/value view; headers without entries map to empty sections
    pub fn sections(&self) -> ConfigSections {
        let mut out = ConfigSections::new();
        for line in &self.lines {
            match line {
                Line::Section { name, .. } => {
                    out.entry(name.clone()).or_default();
                }
                Line::Entry {
                    section,
                    key,
                    value,
                    ..
                } => {
                    out.entry(section.clone())
                        .or_default()
                        .insert(key.clone(), value.clone());
                }
                Line::Other(_) => {}
            }
        }
        out
    }

    /// Render back to text
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                Line::Other(raw) | Line::Section { raw, .. } => out.push_str(raw),
                Line::Entry {
                    raw: Some(raw), ..
                } => out.push_str(raw),
                Line::Entry {
                    key,
                    value,
                    raw: None,
                    ..
                } => {
                    out.push_str(key);
                    out.push_str(" = ");
                    out.push_str(value);
                }
            }
            out.push('\n');
        }
        out
    }

    fn last_index_of_section(&self, section: &str) -> Option<usize> {
        self.lines.iter().rposition(|line| match line {
            Line::Section { name, .. } => name == section,
            Line::Entry { section: s, .. } => s == section,
            Line::Other(_) => false,
        })
    }
}
