// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Minimal INI document model.
//!
//! ```text
//! ; comment            -> attached to the next section/key
//! [Section]            -> Section (case-insensitive lookup)
//! Key=Value            -> Entry   (case-insensitive lookup)
//! ```
//!
//! Order of sections and keys is preserved, as is the original casing, so a
//! rewrite only changes what was actually set.

use std::fmt;

use thiserror::Error;

/// Syntax error with the 1-based line it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct IniSyntaxError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    key: String,
    value: String,
    comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    name: String,
    comments: Vec<String>,
    entries: Vec<Entry>,
}

impl Section {
    fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key.eq_ignore_ascii_case(key))
    }

    fn entry_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.entries
            .iter_mut()
            .find(|e| e.key.eq_ignore_ascii_case(key))
    }
}

/// Parsed INI file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<Section>,
    trailing_comments: Vec<String>,
}

fn is_comment(line: &str) -> bool {
    line.starts_with(';') || line.starts_with('#')
}

impl IniDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses INI text.
    ///
    /// # Errors
    ///
    /// Returns [`IniSyntaxError`] for a line that is neither blank, a comment,
    /// a `[section]` header nor a `key=value` pair, and for keys that appear
    /// before the first section.
    pub fn parse(text: &str) -> Result<Self, IniSyntaxError> {
        let mut doc = Self::new();
        let mut pending_comments = Vec::new();
        let mut current: Option<usize> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            let line_no = index + 1;

            if line.is_empty() {
                continue;
            }

            if is_comment(line) {
                pending_comments.push(line.to_string());
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest.strip_suffix(']').ok_or_else(|| IniSyntaxError {
                    line: line_no,
                    message: format!("unterminated section header '{line}'"),
                })?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(IniSyntaxError {
                        line: line_no,
                        message: "empty section name".to_string(),
                    });
                }

                let position = doc.section_index(name).unwrap_or_else(|| {
                    doc.sections.push(Section {
                        name: name.to_string(),
                        comments: Vec::new(),
                        entries: Vec::new(),
                    });
                    doc.sections.len() - 1
                });
                doc.sections[position]
                    .comments
                    .append(&mut pending_comments);
                current = Some(position);
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(IniSyntaxError {
                    line: line_no,
                    message: format!("expected 'key=value', found '{line}'"),
                });
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(IniSyntaxError {
                    line: line_no,
                    message: "empty key".to_string(),
                });
            }
            let Some(position) = current else {
                return Err(IniSyntaxError {
                    line: line_no,
                    message: format!("key '{key}' appears before any section"),
                });
            };

            let section = &mut doc.sections[position];
            let comments = std::mem::take(&mut pending_comments);
            if let Some(entry) = section.entry_mut(key) {
                entry.value = value.trim().to_string();
                entry.comments.extend(comments);
            } else {
                section.entries.push(Entry {
                    key: key.to_string(),
                    value: value.trim().to_string(),
                    comments,
                });
            }
        }

        doc.trailing_comments = pending_comments;
        Ok(doc)
    }

    fn section_index(&self, name: &str) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Returns the raw value of `section.key`.
    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let index = self.section_index(section)?;
        self.sections[index]
            .entry(key)
            .map(|entry| entry.value.as_str())
    }

    /// Returns whether `section.key` is present.
    #[must_use]
    pub fn contains_key(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    /// Returns whether a section with this name exists.
    #[must_use]
    pub fn has_section(&self, section: &str) -> bool {
        self.section_index(section).is_some()
    }

    /// Sets `section.key`, creating the section and key as needed.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        let value = value.into();
        let index = self.section_index(section).unwrap_or_else(|| {
            self.sections.push(Section {
                name: section.to_string(),
                comments: Vec::new(),
                entries: Vec::new(),
            });
            self.sections.len() - 1
        });

        let section = &mut self.sections[index];
        if let Some(entry) = section.entry_mut(key) {
            entry.value = value;
        } else {
            section.entries.push(Entry {
                key: key.to_string(),
                value,
                comments: Vec::new(),
            });
        }
    }

    /// Section names in document order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// Keys of a section in document order (empty when the section is absent).
    #[must_use]
    pub fn keys(&self, section: &str) -> Vec<&str> {
        self.section_index(section)
            .map(|i| {
                self.sections[i]
                    .entries
                    .iter()
                    .map(|e| e.key.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for comment in &section.comments {
                writeln!(f, "{comment}")?;
            }
            writeln!(f, "[{}]", section.name)?;
            for entry in &section.entries {
                for comment in &entry.comments {
                    writeln!(f, "{comment}")?;
                }
                writeln!(f, "{}={}", entry.key, entry.value)?;
            }
        }
        for comment in &self.trailing_comments {
            writeln!(f, "{comment}")?;
        }
        Ok(())
    }
}
