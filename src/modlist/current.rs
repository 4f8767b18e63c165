// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Codec for the `ModList.txt` format.
//!
//! ```text
//! <ModA|>ModB|<ModC
//!  ^      ^
//!  |      '-- '>' disabled
//!  '--------- '<' enabled
//! ```
//!
//! One line; tokens without a marker, with an invalid name, or repeating an
//! earlier name (ignoring case) are dropped.

use std::path::Path;

use tracing::debug;

use crate::error::{FsError, RmmResult};
use crate::utility::encoding::decode_text;

use super::{ModEntry, ModList};

const ENABLED_MARKER: char = '<';
const DISABLED_MARKER: char = '>';
const SEPARATOR: &str = "|";

/// Outcome of [`write_current_list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// The file was (re)written.
    Written,
    /// The list was empty; the file was left as it was.
    Skipped,
}

/// Serializes `list` into a single line.
#[must_use]
pub fn serialize(list: &ModList) -> String {
    let tokens: Vec<String> = list
        .iter()
        .map(|entry| {
            let marker = if entry.is_enabled() {
                ENABLED_MARKER
            } else {
                DISABLED_MARKER
            };
            format!("{marker}{}", entry.name())
        })
        .collect();
    tokens.join(SEPARATOR)
}

/// Parses the first line of `text`.
#[must_use]
pub fn parse(text: &str) -> ModList {
    let mut list = ModList::new();
    let Some(line) = text.lines().next() else {
        return list;
    };

    for token in line.split(SEPARATOR).filter(|t| !t.is_empty()) {
        let mut chars = token.chars();
        let enabled = match chars.next() {
            Some(ENABLED_MARKER) => true,
            Some(DISABLED_MARKER) => false,
            _ => {
                debug!(token, "skipping mod list token without marker");
                continue;
            }
        };

        let entry = ModEntry::new(chars.as_str(), enabled);
        if entry.is_valid() {
            list.push(entry);
        }
    }
    list
}

/// Reads `path`; a missing file yields an empty list.
///
/// # Errors
///
/// Returns `FsError::Io` if the file exists but cannot be read.
pub fn read_current_list(path: &Path) -> RmmResult<ModList> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(parse(&decode_text(&bytes))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ModList::new()),
        Err(e) => Err(FsError::io(path, e).into()),
    }
}

/// Writes `list` to `path`. An empty list leaves the file untouched so a run
/// that found nothing never erases a saved list.
///
/// # Errors
///
/// Returns `FsError::Io` if the file cannot be written.
pub fn write_current_list(path: &Path, list: &ModList) -> RmmResult<WriteStatus> {
    if list.is_empty() {
        return Ok(WriteStatus::Skipped);
    }
    std::fs::write(path, serialize(list)).map_err(|e| FsError::io(path, e))?;
    Ok(WriteStatus::Written)
}
