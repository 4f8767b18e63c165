// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reader for the deprecated `ModLoadOrder.txt` format.
//!
//! ```text
//! ; full-line comment           skipped
//! ModA                          kept if a mod directory of that name exists
//! ModB ; trailing comment       -> "ModB"
//! moda                          duplicate of ModA, dropped
//! ```
//!
//! Every listed mod was implicitly enabled in this format.

use std::path::Path;

use crate::error::{FsError, RmmResult};
use crate::utility::encoding::decode_text;

use super::{is_valid_name, names_equal};

/// Extracts the mod name from one line, `None` for comment/blank lines.
fn line_name(line: &str) -> Option<&str> {
    if line.starts_with(';') {
        return None;
    }
    let name = line.split_once(';').map_or(line, |(name, _comment)| name).trim();
    (!name.is_empty()).then_some(name)
}

/// Parses legacy list text. `exists` decides whether a mod directory is
/// present; names it rejects are dropped.
pub fn parse_legacy_list<F>(text: &str, mut exists: F) -> Vec<String>
where
    F: FnMut(&str) -> bool,
{
    let mut mods: Vec<String> = Vec::new();
    for name in text.lines().filter_map(line_name) {
        if !is_valid_name(name) || mods.iter().any(|m| names_equal(m, name)) {
            continue;
        }
        if exists(name) {
            mods.push(name.to_string());
        }
    }
    mods
}

/// Reads `path`, keeping names that match one of the `installed` mod
/// directories (ignoring case). A missing file yields an empty list.
///
/// # Errors
///
/// Returns `FsError::Io` if the file exists but cannot be read.
pub fn read_legacy_list(path: &Path, installed: &[String]) -> RmmResult<Vec<String>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(FsError::io(path, e).into()),
    };

    Ok(parse_legacy_list(&decode_text(&bytes), |name| {
        installed.iter().any(|dir| names_equal(dir, name))
    }))
}
