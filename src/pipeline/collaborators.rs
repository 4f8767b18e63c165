// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Generation-side collaborators.
//!
//! ```text
//! Generating
//!   Repacker::remove_stale_artifacts()     ParlessRepacker: rm -r mods/Parless
//!   LoadOrderGenerator::generate(request)  ListingGenerator: names -> .mlo
//! ```

use std::path::PathBuf;

use anyhow::Context;
use tracing::debug;

use crate::config::paths::GameLayout;
use crate::error::Result;

/// Input for a load-order generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Enabled mod names, highest priority first.
    pub mods: Vec<String>,
    /// Whether loose `.parless` paths are loaded too.
    pub loose_files: bool,
    /// Whether the loader rebuilds the artifact on game start.
    pub rebuild_mlo: bool,
}

/// Produces the load-order artifact the loader reads.
pub trait LoadOrderGenerator: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be produced.
    fn generate(&self, request: &GenerationRequest) -> Result<()>;
}

/// Cleans up archives repacked by earlier runs.
pub trait Repacker: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if stale output exists but cannot be removed.
    fn remove_stale_artifacts(&self) -> Result<()>;
}

/// Writes the request as a plain listing to `YakuzaParless.mlo`.
///
/// ```text
/// ; loose_files=0 rebuild_mlo=1
/// ModA
/// ModB
/// ```
#[derive(Debug, Clone)]
pub struct ListingGenerator {
    output: PathBuf,
}

impl ListingGenerator {
    #[must_use]
    pub fn new(layout: &GameLayout) -> Self {
        Self {
            output: layout.load_order(),
        }
    }

    /// Renders the listing written by [`generate`](LoadOrderGenerator::generate).
    #[must_use]
    pub fn render(request: &GenerationRequest) -> String {
        let mut out = format!(
            "; loose_files={} rebuild_mlo={}\n",
            u8::from(request.loose_files),
            u8::from(request.rebuild_mlo)
        );
        for name in &request.mods {
            out.push_str(name);
            out.push('\n');
        }
        out
    }
}

impl LoadOrderGenerator for ListingGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<()> {
        std::fs::write(&self.output, Self::render(request))
            .with_context(|| format!("failed to write {}", self.output.display()))?;
        debug!(path = %self.output.display(), mods = request.mods.len(), "load order written");
        Ok(())
    }
}

/// Removes `mods/Parless`, where repacked archives are placed.
#[derive(Debug, Clone)]
pub struct ParlessRepacker {
    repacked_dir: PathBuf,
}

impl ParlessRepacker {
    #[must_use]
    pub fn new(layout: &GameLayout) -> Self {
        Self {
            repacked_dir: layout.repacked_dir(),
        }
    }
}

impl Repacker for ParlessRepacker {
    fn remove_stale_artifacts(&self) -> Result<()> {
        if !self.repacked_dir.is_dir() {
            return Ok(());
        }
        std::fs::remove_dir_all(&self.repacked_dir)
            .with_context(|| format!("failed to remove {}", self.repacked_dir.display()))?;
        debug!(path = %self.repacked_dir.display(), "removed repacked archives");
        Ok(())
    }
}
