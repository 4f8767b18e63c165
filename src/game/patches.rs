// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Game-specific loader fixes applied before generation.
//!
//! ```text
//! Eve:        dinput8.dll --version.dll exists--> delete
//!                         --otherwise---------> rename to version.dll
//! Judgment,
//! LostJudgment: dinput8.dll --> delete
//!               no winmm.dll: winmm.lj --> rename to winmm.dll
//!                             no winmm.lj --> warning only
//! ```
//!
//! Every patch checks the filesystem first, so applying twice does nothing
//! the second time.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::paths::{GameLayout, WINMM_LJ};
use crate::error::{FsError, RmmResult};

use super::Game;

/// One change (or problem) a patch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchAction {
    Deleted(PathBuf),
    Renamed { from: PathBuf, to: PathBuf },
    /// A file the patch needs is absent and nothing could be done.
    MissingFile(PathBuf),
}

impl fmt::Display for PatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deleted(path) => write!(f, "deleted {}", path.display()),
            Self::Renamed { from, to } => {
                write!(f, "renamed {} to {}", from.display(), to.display())
            }
            Self::MissingFile(path) => write!(f, "missing {}", path.display()),
        }
    }
}

fn delete(path: &Path) -> RmmResult<PatchAction> {
    std::fs::remove_file(path).map_err(|e| FsError::io(path, e))?;
    Ok(PatchAction::Deleted(path.to_path_buf()))
}

fn rename(from: &Path, to: &Path) -> RmmResult<PatchAction> {
    std::fs::rename(from, to).map_err(|e| FsError::io(from, e))?;
    Ok(PatchAction::Renamed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
    })
}

fn patch_eve(layout: &GameLayout) -> RmmResult<Vec<PatchAction>> {
    let dinput8 = layout.dinput8_dll();
    if !dinput8.is_file() {
        return Ok(Vec::new());
    }

    let version = layout.version_dll();
    let action = if version.is_file() {
        debug!("version.dll present, deleting dinput8.dll");
        delete(&dinput8)?
    } else {
        debug!("moving dinput8.dll to version.dll");
        rename(&dinput8, &version)?
    };
    Ok(vec![action])
}

fn patch_judgment(layout: &GameLayout) -> RmmResult<Vec<PatchAction>> {
    let mut actions = Vec::new();

    let dinput8 = layout.dinput8_dll();
    if dinput8.is_file() {
        debug!("deleting dinput8.dll for Judgment series");
        actions.push(delete(&dinput8)?);
    }

    let winmm = layout.winmm_dll();
    if !winmm.is_file() {
        let winmm_lj = layout.winmm_lj();
        if winmm_lj.is_file() {
            debug!("enabling winmm.dll from {WINMM_LJ}");
            actions.push(rename(&winmm_lj, &winmm)?);
        } else {
            actions.push(PatchAction::MissingFile(winmm_lj));
        }
    }
    Ok(actions)
}

/// Applies the fixes `game` needs and returns what changed.
///
/// # Errors
///
/// Returns `FsError::Io` if a delete or rename fails.
pub fn apply_game_patches(game: Game, layout: &GameLayout) -> RmmResult<Vec<PatchAction>> {
    match game {
        Game::Eve => patch_eve(layout),
        Game::Judgment | Game::LostJudgment => patch_judgment(layout),
        _ => Ok(Vec::new()),
    }
}
