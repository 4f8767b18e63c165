// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Versioned INI configuration.
//!
//! # Load Pipeline
//!
//! ```text
//! VersionedConfig::load(path)
//!   missing file ---------------> defaults, write  (Created)
//!   parse error ----------------> ConfigError::Parse (fatal)
//!   IniVersion missing or < 4 --> overrides (<= 3: RebuildMLO=1)
//!                                 + missing keys
//!                                 + IniVersion=4, write (Upgraded)
//!   otherwise ------------------> as is (Current)
//! ```
//!
//! Every mutation is written back immediately with [`VersionedConfig::save`];
//! writes are whole-file rewrites and are not rolled back on failure.

pub mod defaults;
pub mod ini;
pub mod paths;
pub mod types;


use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{ConfigError, RmmResult};
use crate::utility::encoding::decode_text;

use defaults::{CURRENT_VERSION, ConfigKey};
use ini::IniDocument;
use types::IniValue;

/// What `load` had to do to produce the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// No file existed; a default one was written.
    Created,
    /// The file was outdated and has been rewritten.
    Upgraded { from: Option<u32> },
    /// The file was already at the current version.
    Current,
}

/// INI configuration with a schema version.
#[derive(Debug, Clone)]
pub struct VersionedConfig {
    path: PathBuf,
    document: IniDocument,
    status: LoadStatus,
}

impl VersionedConfig {
    /// Schema version written by this release.
    pub const CURRENT_VERSION: u32 = CURRENT_VERSION;

    /// Loads, creates or upgrades the configuration at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file exists but cannot be read,
    /// `ConfigError::Parse` if it is not valid INI, and `ConfigError::Write`
    /// if creating or upgrading the file fails.
    pub fn load(path: impl Into<PathBuf>) -> RmmResult<Self> {
        let path = path.into();

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config not found, creating defaults");
                let config = Self {
                    path,
                    document: defaults::new_document(),
                    status: LoadStatus::Created,
                };
                config.save()?;
                return Ok(config);
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                }
                .into());
            }
        };

        let document =
            IniDocument::parse(&decode_text(&bytes)).map_err(|e| ConfigError::Parse {
                path: path.display().to_string(),
                line: e.line,
                message: e.message,
            })?;

        let mut config = Self {
            path,
            document,
            status: LoadStatus::Current,
        };

        let version = config.version();
        if version.is_none_or(|v| v < CURRENT_VERSION) {
            config.upgrade(version)?;
        }

        Ok(config)
    }

    fn upgrade(&mut self, from: Option<u32>) -> RmmResult<()> {
        for (key, value) in defaults::version_overrides(from) {
            debug!(section = key.section, key = key.key, value, "forcing value during upgrade");
            self.document.set(key.section, key.key, value);
        }

        let added = defaults::fill_missing(&mut self.document);
        self.set(
            ConfigKey::INI_VERSION.section,
            ConfigKey::INI_VERSION.key,
            CURRENT_VERSION,
        );
        debug!(?from, to = CURRENT_VERSION, added, "upgrading config");

        self.status = LoadStatus::Upgraded { from };
        self.save()
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// What happened while loading.
    #[must_use]
    pub const fn status(&self) -> LoadStatus {
        self.status
    }

    /// Parsed `[Parless] IniVersion`, `None` when absent or not a number.
    #[must_use]
    pub fn version(&self) -> Option<u32> {
        let key = ConfigKey::INI_VERSION;
        self.document
            .get(key.section, key.key)
            .and_then(u32::parse_ini)
    }

    /// The underlying document.
    #[must_use]
    pub const fn document(&self) -> &IniDocument {
        &self.document
    }

    /// Returns whether `section.key` exists.
    #[must_use]
    pub fn contains(&self, section: &str, key: &str) -> bool {
        self.document.contains_key(section, key)
    }

    /// Returns the typed value of `section.key`, or `default` when it is
    /// absent or cannot be parsed.
    #[must_use]
    pub fn get<T: IniValue>(&self, section: &str, key: &str, default: T) -> T {
        match self.document.get(section, key) {
            None => default,
            Some(raw) => T::parse_ini(raw).unwrap_or_else(|| {
                warn!(
                    section,
                    key,
                    value = raw,
                    "invalid value in {}, using default",
                    self.path.display()
                );
                default
            }),
        }
    }

    /// [`get`](Self::get) for a known key.
    #[must_use]
    pub fn value<T: IniValue>(&self, key: ConfigKey, default: T) -> T {
        self.get(key.section, key.key, default)
    }

    /// Sets `section.key` in memory. Call [`save`](Self::save) to persist it.
    pub fn set<T: IniValue>(&mut self, section: &str, key: &str, value: T) {
        self.document.set(section, key, value.to_ini());
    }

    /// Sets a known key and writes the file immediately.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Write` if the file cannot be written.
    pub fn set_and_save<T: IniValue>(&mut self, key: ConfigKey, value: T) -> RmmResult<()> {
        self.set(key.section, key.key, value);
        self.save()
    }

    /// Rewrites the whole file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Write` if the file cannot be written.
    pub fn save(&self) -> RmmResult<()> {
        std::fs::write(&self.path, self.document.to_string()).map_err(|source| {
            ConfigError::Write {
                path: self.path.display().to_string(),
                source,
            }
        })?;
        Ok(())
    }
}
