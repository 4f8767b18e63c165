// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Discovery of mod directories under `mods/`.
//!
//! ```text
//! mods/
//!   ModA/          -> "ModA"
//!   Parless/       reserved, skipped
//!   _externalMods/ reserved, skipped
//!   readme.txt     not a directory, skipped
//! ```

use std::path::Path;

use ignore::WalkBuilder;
use tracing::warn;

use crate::config::paths::RESERVED_MOD_DIRS;
use crate::error::{FsError, RmmResult};

use super::{is_valid_name, names_equal};

/// Returns whether `name` is one of the directories the scanner never reports.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_MOD_DIRS.iter().any(|r| names_equal(r, name))
}

/// Lists the mod directories directly under `mods_root`, sorted by name.
///
/// Hidden directories are included; nothing is filtered by ignore files.
///
/// # Errors
///
/// Returns `FsError::NotFound` if `mods_root` is not a directory.
pub fn scan_mods(mods_root: &Path) -> RmmResult<Vec<String>> {
    if !mods_root.is_dir() {
        return Err(FsError::NotFound(mods_root.display().to_string()).into());
    }

    let walker = WalkBuilder::new(mods_root)
        .standard_filters(false)
        .max_depth(Some(1))
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut mods = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry under {}", mods_root.display());
                continue;
            }
        };

        if entry.depth() != 1 || !entry.path().is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            warn!(path = %entry.path().display(), "skipping mod directory with non UTF-8 name");
            continue;
        };
        if is_valid_name(name) && !is_reserved(name) {
            mods.push(name.to_string());
        }
    }
    Ok(mods)
}
