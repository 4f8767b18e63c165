// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mod entries and the sources they are reconciled from.
//!
//! # Architecture
//!
//! ```text
//!   ModLoadOrder.txt     ModList.txt        mods/<dir>
//!   (legacy reader)    (current codec)     (scanner)
//!          \                 |                 /
//!           +-------> SourceReconciler <------+
//!                          |
//!                          v
//!                       ModList ----> current writer
//!                          |          MigrationCoordinator (cleanup)
//!                          v
//!                     enabled names --> generator
//! ```
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`ModEntry`] | Mod directory name plus enabled flag |
//! | [`ModList`] | Ordered list, unique by case-insensitive name |
//! | [`reconcile::Reconciliation`] | Reconciled list plus where it came from |
//! | [`migration::PendingMigration`] | Legacy cleanup armed by an import |

pub mod current;
pub mod legacy;
pub mod migration;
pub mod reconcile;
pub mod scan;


use std::fmt;

/// Compares two mod names the way the game's file system does: ignoring case.
#[must_use]
pub fn names_equal(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Returns whether `name` can be used as a mod directory name.
///
/// Rejects empty names, `.`/`..` and anything containing a path separator.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// A mod directory name and whether it is loaded.
///
/// Equality is by name, ignoring case; the enabled flag is not part of the
/// identity.
#[derive(Debug, Clone)]
pub struct ModEntry {
    name: String,
    enabled: bool,
}

impl ModEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
        }
    }

    /// An enabled entry.
    #[must_use]
    pub fn enabled(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_valid_name(&self.name)
    }
}

impl PartialEq for ModEntry {
    fn eq(&self, other: &Self) -> bool {
        names_equal(&self.name, &other.name)
    }
}

impl Eq for ModEntry {}

impl fmt::Display for ModEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.enabled { "enabled" } else { "disabled" };
        write!(f, "{} ({state})", self.name)
    }
}

/// Ordered mod entries; position is load priority.
///
/// No two entries share a name (ignoring case). Adding a name that is already
/// present is a silent no-op, so the first occurrence always wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModList {
    entries: Vec<ModEntry>,
}

impl ModList {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns whether an entry with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| names_equal(&e.name, name))
    }

    /// Looks up an entry by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModEntry> {
        self.entries.iter().find(|e| names_equal(&e.name, name))
    }

    /// Appends `entry` unless its name is already present.
    /// Returns whether the entry was added.
    pub fn push(&mut self, entry: ModEntry) -> bool {
        if self.contains(&entry.name) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Appends every entry whose name is not yet present, in order.
    /// Returns how many were added.
    pub fn extend_unique<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = ModEntry>,
    {
        entries
            .into_iter()
            .map(|e| self.push(e))
            .filter(|added| *added)
            .count()
    }

    /// Keeps only the entries `keep` accepts, preserving order.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&ModEntry) -> bool,
    {
        self.entries.retain(keep);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn entries(&self) -> &[ModEntry] {
        &self.entries
    }

    /// Names of the enabled entries, in load order.
    #[must_use]
    pub fn enabled_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.enabled)
            .map(|e| e.name.clone())
            .collect()
    }
}

impl FromIterator<ModEntry> for ModList {
    fn from_iter<I: IntoIterator<Item = ModEntry>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend_unique(iter);
        list
    }
}

impl<'a> IntoIterator for &'a ModList {
    type Item = &'a ModEntry;
    type IntoIter = std::slice::Iter<'a, ModEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
