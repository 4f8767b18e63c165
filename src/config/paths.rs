// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Well-known files under the game directory.
//!
//! ```text
//! <game root>/
//!   YakuzaParless.ini     config
//!   YakuzaParless.mlo     generated load order
//!   YakuzaParless.asi     loader plugin
//!   dinput8.dll | version.dll | winmm.dll (+ winmm.lj)
//!   ModList.txt           current list format
//!   ModLoadOrder.txt      legacy list format
//!   mods/
//!     Parless/            repacked archives (reserved)
//!     _externalMods/      external mod manager output (reserved)
//!     <mod>/ ...
//! ```

use std::path::{Path, PathBuf};

pub const INI_FILE: &str = "YakuzaParless.ini";
pub const LOAD_ORDER_FILE: &str = "YakuzaParless.mlo";
pub const ASI_FILE: &str = "YakuzaParless.asi";
pub const DINPUT8_DLL: &str = "dinput8.dll";
pub const VERSION_DLL: &str = "version.dll";
pub const WINMM_DLL: &str = "winmm.dll";
pub const WINMM_LJ: &str = "winmm.lj";
pub const CURRENT_LIST_FILE: &str = "ModList.txt";
pub const LEGACY_LIST_FILE: &str = "ModLoadOrder.txt";
pub const MODS_DIR: &str = "mods";
pub const REPACKED_DIR: &str = "Parless";
pub const EXTERNAL_MODS_DIR: &str = "_externalMods";

/// Directory names under `mods/` that are never treated as mods.
pub const RESERVED_MOD_DIRS: &[&str] = &[REPACKED_DIR, EXTERNAL_MODS_DIR];

/// Resolves every path the pipeline touches relative to one game root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLayout {
    root: PathBuf,
}

impl GameLayout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn ini(&self) -> PathBuf {
        self.root.join(INI_FILE)
    }

    /// Generated load-order artifact.
    #[must_use]
    pub fn load_order(&self) -> PathBuf {
        self.root.join(LOAD_ORDER_FILE)
    }

    #[must_use]
    pub fn asi(&self) -> PathBuf {
        self.root.join(ASI_FILE)
    }

    #[must_use]
    pub fn dinput8_dll(&self) -> PathBuf {
        self.root.join(DINPUT8_DLL)
    }

    #[must_use]
    pub fn version_dll(&self) -> PathBuf {
        self.root.join(VERSION_DLL)
    }

    #[must_use]
    pub fn winmm_dll(&self) -> PathBuf {
        self.root.join(WINMM_DLL)
    }

    /// Renamed `winmm.dll` shipped for the Judgment games.
    #[must_use]
    pub fn winmm_lj(&self) -> PathBuf {
        self.root.join(WINMM_LJ)
    }

    #[must_use]
    pub fn current_list(&self) -> PathBuf {
        self.root.join(CURRENT_LIST_FILE)
    }

    #[must_use]
    pub fn legacy_list(&self) -> PathBuf {
        self.root.join(LEGACY_LIST_FILE)
    }

    #[must_use]
    pub fn mods_dir(&self) -> PathBuf {
        self.root.join(MODS_DIR)
    }

    #[must_use]
    pub fn repacked_dir(&self) -> PathBuf {
        self.mods_dir().join(REPACKED_DIR)
    }

    #[must_use]
    pub fn external_mods_dir(&self) -> PathBuf {
        self.mods_dir().join(EXTERNAL_MODS_DIR)
    }

    /// Directory of a single mod by name.
    #[must_use]
    pub fn mod_dir(&self, name: &str) -> PathBuf {
        self.mods_dir().join(name)
    }
}

impl Default for GameLayout {
    fn default() -> Self {
        Self::new(".")
    }
}
