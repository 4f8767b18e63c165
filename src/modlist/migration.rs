// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! One-time import of `ModLoadOrder.txt` into `ModList.txt`.
//!
//! ```text
//! reconcile ---(legacy file, marker unset)---> PendingMigration
//!                                                   |
//! persist_mod_list                                  v
//!   write ModList.txt --Written--> delete ModLoadOrder.txt (kept on failure)
//!                     |            ModListImported = 1, save
//!                     '--Skipped--> nothing; import retried next run
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::VersionedConfig;
use crate::config::defaults::ConfigKey;
use crate::config::paths::GameLayout;
use crate::error::RmmResult;

use super::current::{WriteStatus, write_current_list};
use super::reconcile::Reconciliation;

/// Returns whether this run must import the legacy list instead of reading
/// `ModList.txt`.
#[must_use]
pub fn should_import_legacy(config: &VersionedConfig, layout: &GameLayout) -> bool {
    layout.legacy_list().is_file() && !config.value(ConfigKey::MOD_LIST_IMPORTED, false)
}

/// How the legacy cleanup went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// The legacy file is gone and the marker is saved.
    Completed,
    /// The marker is saved but the legacy file could not be deleted.
    LegacyFileKept { error: String },
}

/// A legacy import that still has to be finalized.
///
/// Dropping it without calling [`complete`](Self::complete) leaves both the
/// legacy file and the marker untouched, so the import happens again.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct PendingMigration {
    legacy_file: PathBuf,
}

impl PendingMigration {
    pub fn new(legacy_file: impl Into<PathBuf>) -> Self {
        Self {
            legacy_file: legacy_file.into(),
        }
    }

    #[must_use]
    pub fn legacy_file(&self) -> &Path {
        &self.legacy_file
    }

    /// Deletes the legacy file and records the import in the configuration.
    ///
    /// A failed delete is returned as [`CleanupOutcome::LegacyFileKept`],
    /// never as an error; the marker is saved either way.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Write` if the marker cannot be saved.
    pub fn complete(self, config: &mut VersionedConfig) -> RmmResult<CleanupOutcome> {
        let outcome = match std::fs::remove_file(&self.legacy_file) {
            Ok(()) => CleanupOutcome::Completed,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CleanupOutcome::Completed,
            Err(e) => {
                debug!(error = %e, legacy = %self.legacy_file.display(), "legacy file kept");
                CleanupOutcome::LegacyFileKept {
                    error: e.to_string(),
                }
            }
        };

        config.set_and_save(ConfigKey::MOD_LIST_IMPORTED, true)?;
        info!("Mod list was imported successfully.");
        Ok(outcome)
    }
}

/// What [`persist_mod_list`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistOutcome {
    /// `None` when the list was the external-only placeholder.
    pub write: Option<WriteStatus>,
    /// `Some` when a pending migration was finalized.
    pub cleanup: Option<CleanupOutcome>,
}

/// Writes the reconciled list and, if it was written, finalizes a pending
/// migration.
///
/// # Errors
///
/// Returns an error if `ModList.txt` or the configuration cannot be written.
pub fn persist_mod_list(
    reconciliation: &mut Reconciliation,
    config: &mut VersionedConfig,
    layout: &GameLayout,
) -> RmmResult<PersistOutcome> {
    if reconciliation.is_external_only() {
        debug!("external-only list is not saved");
        return Ok(PersistOutcome {
            write: None,
            cleanup: None,
        });
    }

    let status = write_current_list(&layout.current_list(), &reconciliation.mods)?;
    let cleanup = match (status, reconciliation.migration.take()) {
        (WriteStatus::Written, Some(pending)) => Some(pending.complete(config)?),
        (WriteStatus::Skipped, Some(pending)) => {
            debug!(
                legacy = %pending.legacy_file().display(),
                "mod list empty, legacy import left pending"
            );
            None
        }
        (_, None) => None,
    };

    Ok(PersistOutcome {
        write: Some(status),
        cleanup,
    })
}
