// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Typed values stored in the INI file.
//!
//! ```text
//! IniValue:     bool ("0"/"1", "true"/"false"), integers, String
//! RunSettings:  flags read once per run from VersionedConfig
//! ```

use super::VersionedConfig;
use super::defaults::ConfigKey;

/// Conversion between INI strings and Rust values.
pub trait IniValue: Sized {
    /// Parses a raw value, `None` when it is not valid for this type.
    fn parse_ini(raw: &str) -> Option<Self>;

    /// Renders the value the way it is written to the file.
    fn to_ini(&self) -> String;
}

impl IniValue for bool {
    fn parse_ini(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw == "1" || raw.eq_ignore_ascii_case("true") {
            Some(true)
        } else if raw == "0" || raw.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    fn to_ini(&self) -> String {
        if *self { "1" } else { "0" }.to_string()
    }
}

macro_rules! impl_ini_value_for_int {
    ($($int:ty),+ $(,)?) => {
        $(
            impl IniValue for $int {
                fn parse_ini(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }

                fn to_ini(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

impl_ini_value_for_int!(i32, i64, u32, u64);

impl IniValue for String {
    fn parse_ini(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }

    fn to_ini(&self) -> String {
        self.clone()
    }
}

/// Flags that steer a single run.
///
/// Taken as a snapshot after the config has been loaded; later config writes
/// (such as the `RebuildMLO` overrides) are applied to both the file and the
/// snapshot by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    pub loose_files_enabled: bool,
    pub verbose: bool,
    pub check_for_updates: bool,
    pub show_warnings: bool,
    pub external_mods_only: bool,
    pub rebuild_mlo: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            loose_files_enabled: false,
            verbose: false,
            check_for_updates: true,
            show_warnings: true,
            external_mods_only: false,
            rebuild_mlo: true,
        }
    }
}

impl RunSettings {
    /// Reads every flag, falling back to the defaults for absent keys.
    #[must_use]
    pub fn from_config(config: &VersionedConfig) -> Self {
        let defaults = Self::default();
        Self {
            loose_files_enabled: config
                .value(ConfigKey::LOOSE_FILES_ENABLED, defaults.loose_files_enabled),
            verbose: config.value(ConfigKey::VERBOSE, defaults.verbose),
            check_for_updates: config.value(ConfigKey::CHECK_FOR_UPDATES, defaults.check_for_updates),
            show_warnings: config.value(ConfigKey::SHOW_WARNINGS, defaults.show_warnings),
            external_mods_only: config
                .value(ConfigKey::LOAD_EXTERNAL_MODS_ONLY, defaults.external_mods_only),
            rebuild_mlo: config.value(ConfigKey::REBUILD_MLO, defaults.rebuild_mlo),
        }
    }
}
