// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Merges every mod source into one list.
//!
//! ```text
//! external-only && mods/_externalMods exists
//!     --> [ _externalMods ]                         (nothing else read)
//! else
//!     1. legacy file && !ModListImported --> legacy names, enabled  (migrating)
//!        else current file              --> current entries
//!        else                           --> []
//!     2. scan mods/ --> append unseen names,
//!                       enabled = !migrating
//! ```
//!
//! `mods/` is scanned once up front. Names are compared ignoring case at
//! every step, existence checks included; the first source to name a mod
//! decides its position, spelling and flag.

use tracing::{debug, info};

use crate::config::VersionedConfig;
use crate::config::paths::{EXTERNAL_MODS_DIR, GameLayout};
use crate::error::RmmResult;

use super::current::read_current_list;
use super::legacy::read_legacy_list;
use super::migration::{PendingMigration, should_import_legacy};
use super::scan::scan_mods;
use super::{ModEntry, ModList, names_equal};

/// Where the ordered part of a reconciled list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSource {
    /// The single external-mods entry; no list was read.
    ExternalOnly,
    /// Imported from the legacy `ModLoadOrder.txt`.
    Legacy,
    /// Read from `ModList.txt`.
    Current,
    /// No list file; everything came from the directory scan.
    ScanOnly,
}

/// Result of [`reconcile`].
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub mods: ModList,
    pub source: ListSource,
    /// Entries appended by the directory scan.
    pub scanned: usize,
    /// Set when this run imported the legacy file.
    pub migration: Option<PendingMigration>,
}

impl Reconciliation {
    /// Whether the list is the external-only placeholder rather than a real
    /// mod list.
    #[must_use]
    pub fn is_external_only(&self) -> bool {
        self.source == ListSource::ExternalOnly
    }
}

/// Builds the mod list for this run.
///
/// # Errors
///
/// Returns an error if a list file exists but cannot be read, or the mods
/// directory cannot be listed.
pub fn reconcile(
    config: &VersionedConfig,
    layout: &GameLayout,
    external_only: bool,
) -> RmmResult<Reconciliation> {
    if external_only && layout.external_mods_dir().is_dir() {
        debug!("external mods only, skipping mod list");
        return Ok(Reconciliation {
            mods: std::iter::once(ModEntry::enabled(EXTERNAL_MODS_DIR)).collect(),
            source: ListSource::ExternalOnly,
            scanned: 0,
            migration: None,
        });
    }

    let mods_dir = layout.mods_dir();
    let installed = if mods_dir.is_dir() {
        scan_mods(&mods_dir)?
    } else {
        Vec::new()
    };
    let is_installed = |name: &str| installed.iter().any(|dir| names_equal(dir, name));

    let mut mods = ModList::new();
    let mut migration = None;

    let source = if should_import_legacy(config, layout) {
        let legacy = layout.legacy_list();
        info!(
            "Old format load order file ({}) was found. Importing to the new format...",
            legacy.display()
        );
        let names = read_legacy_list(&legacy, &installed)?;
        mods.extend_unique(names.into_iter().map(ModEntry::enabled));
        migration = Some(PendingMigration::new(legacy));
        ListSource::Legacy
    } else if layout.current_list().is_file() {
        let mut current = read_current_list(&layout.current_list())?;
        current.retain(|entry| is_installed(entry.name()));
        mods.extend_unique(current.iter().cloned());
        ListSource::Current
    } else {
        info!(
            "{} was not found. Will load all existing mods.",
            layout.current_list().display()
        );
        ListSource::ScanOnly
    };

    // A legacy list only named the mods it loaded; anything else on disk
    // stays off after the import.
    let scan_default = migration.is_none();
    let scanned = mods.extend_unique(
        installed
            .into_iter()
            .map(|name| ModEntry::new(name, scan_default)),
    );

    debug!(?source, total = mods.len(), scanned, "reconciled mod list");

    Ok(Reconciliation {
        mods,
        source,
        scanned,
        migration,
    })
}
