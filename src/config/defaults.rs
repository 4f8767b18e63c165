// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Known configuration keys and their defaults.
//!
//! ```text
//! CURRENT_VERSION = 4
//! new_document()        every key at its default
//! fill_missing(doc)     add absent keys, keep existing values
//! version_overrides()   values forced when upgrading from old versions
//! ```

use super::ini::IniDocument;

/// Schema version written by this release.
pub const CURRENT_VERSION: u32 = 4;

/// Highest schema version that predates the `RebuildMLO` default change.
pub const FORCE_REBUILD_MLO_MAX_VERSION: u32 = 3;

/// A `section.key` pair in the INI file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigKey {
    pub section: &'static str,
    pub key: &'static str,
}

impl ConfigKey {
    pub const INI_VERSION: Self = Self::new("Parless", "IniVersion");
    pub const PARLESS_ENABLED: Self = Self::new("Parless", "ParlessEnabled");
    pub const TEMP_DISABLED: Self = Self::new("Parless", "TempDisabled");
    pub const LOOSE_FILES_ENABLED: Self = Self::new("Overrides", "LooseFilesEnabled");
    pub const REBUILD_MLO: Self = Self::new("Overrides", "RebuildMLO");
    pub const LOCALE: Self = Self::new("Overrides", "Locale");
    pub const VERBOSE: Self = Self::new("RyuModManager", "Verbose");
    pub const CHECK_FOR_UPDATES: Self = Self::new("RyuModManager", "CheckForUpdates");
    pub const SHOW_WARNINGS: Self = Self::new("RyuModManager", "ShowWarnings");
    pub const LOAD_EXTERNAL_MODS_ONLY: Self = Self::new("RyuModManager", "LoadExternalModsOnly");
    pub const LOG_MODS: Self = Self::new("Logs", "LogMods");
    pub const LOG_PARLESS: Self = Self::new("Logs", "LogParless");
    pub const LOG_ALL: Self = Self::new("Logs", "LogAll");
    pub const CONSOLE_ENABLED: Self = Self::new("Debug", "ConsoleEnabled");
    pub const MOD_LIST_IMPORTED: Self = Self::new("SavedSettings", "ModListImported");

    #[must_use]
    pub const fn new(section: &'static str, key: &'static str) -> Self {
        Self { section, key }
    }
}

/// Every key a freshly created file carries, in write order.
pub const DEFAULT_KEYS: &[(ConfigKey, &str)] = &[
    (ConfigKey::INI_VERSION, "4"),
    (ConfigKey::PARLESS_ENABLED, "1"),
    (ConfigKey::TEMP_DISABLED, "0"),
    (ConfigKey::LOOSE_FILES_ENABLED, "0"),
    (ConfigKey::REBUILD_MLO, "1"),
    (ConfigKey::LOCALE, "English"),
    (ConfigKey::VERBOSE, "0"),
    (ConfigKey::CHECK_FOR_UPDATES, "1"),
    (ConfigKey::SHOW_WARNINGS, "1"),
    (ConfigKey::LOAD_EXTERNAL_MODS_ONLY, "0"),
    (ConfigKey::LOG_MODS, "0"),
    (ConfigKey::LOG_PARLESS, "0"),
    (ConfigKey::LOG_ALL, "0"),
    (ConfigKey::CONSOLE_ENABLED, "0"),
];

/// Builds a document holding every default key.
#[must_use]
pub fn new_document() -> IniDocument {
    let mut doc = IniDocument::new();
    fill_missing(&mut doc);
    doc
}

/// Adds every default key that is absent. Returns how many were added.
pub fn fill_missing(doc: &mut IniDocument) -> usize {
    let mut added = 0;
    for (key, value) in DEFAULT_KEYS {
        if !doc.contains_key(key.section, key.key) {
            doc.set(key.section, key.key, *value);
            added += 1;
        }
    }
    added
}

/// Values forced when upgrading from `from` (`None` = no version recorded).
#[must_use]
pub fn version_overrides(from: Option<u32>) -> Vec<(ConfigKey, &'static str)> {
    let mut overrides = Vec::new();
    if from.is_none_or(|v| v <= FORCE_REBUILD_MLO_MAX_VERSION) {
        overrides.push((ConfigKey::REBUILD_MLO, "1"));
    }
    overrides
}
