// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! One mod manager run, phase by phase.
//!
//! # Architecture
//!
//! ```text
//! Configuring --> Reconciling --> Patching --> Generating --> Validating --> Done
//!   config load     reconcile        game fixes    abort?  ------+   warnings
//!   game detect     persist list                   rm .mlo       |   probe.join
//!   probe spawn     migration                      repacker      |   acknowledge
//!                   RebuildMLO=0                   generator     v
//!                                                             Aborted
//!                                                               probe abandoned
//!                                                               acknowledge
//! ```
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Pipeline`] | Owns the collaborators and drives the phases |
//! | [`Phase`] | Linear state of a run |
//! | [`RunOptions`] | Run-wide flags from the command line |
//! | [`RunReport`] | Phases visited, outcome, final list, update result |
//!
//! Every external effect other than plain file I/O goes through a trait
//! ([`GameDetector`], [`ExecutableValidator`], [`LoadOrderGenerator`],
//! [`Repacker`], [`ReleaseSource`], [`Reporter`]) so runs can be tested
//! against a temporary directory.

pub mod collaborators;
pub mod reporter;

#[cfg(test)]
mod tests;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bon::Builder;
use tracing::debug;

use crate::config::defaults::ConfigKey;
use crate::config::paths::{ASI_FILE, DINPUT8_DLL, GameLayout, INI_FILE, LEGACY_LIST_FILE, MODS_DIR};
use crate::config::types::RunSettings;
use crate::config::{LoadStatus, VersionedConfig};
use crate::error::{FsError, Result};
use crate::game::patches::{PatchAction, apply_game_patches};
use crate::game::{
    DigestValidator, ExecutableScanDetector, ExecutableValidator, Game, GameDetector,
    MissingComponents, missing_components,
};
use crate::modlist::ModList;
use crate::modlist::migration::{CleanupOutcome, persist_mod_list};
use crate::modlist::reconcile::reconcile;
use crate::update::{GitHubReleases, ProbeOutcome, ReleaseSource, UpdateProbe};

use collaborators::{
    GenerationRequest, ListingGenerator, LoadOrderGenerator, ParlessRepacker, Repacker,
};
use reporter::{ConsoleReporter, Reporter};

/// Default wait for the update check before giving up on it.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// State of a run. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Configuring,
    Reconciling,
    Patching,
    Generating,
    Validating,
    Done,
    /// Generation was refused; terminal.
    Aborted,
}

impl Phase {
    /// Phases of a successful run, in order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Configuring,
            Self::Reconciling,
            Self::Patching,
            Self::Generating,
            Self::Validating,
            Self::Done,
        ]
    }

    /// The phase that follows on success, `None` for terminal phases.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Configuring => Some(Self::Reconciling),
            Self::Reconciling => Some(Self::Patching),
            Self::Patching => Some(Self::Generating),
            Self::Generating => Some(Self::Validating),
            Self::Validating => Some(Self::Done),
            Self::Done | Self::Aborted => None,
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Configuring => "configuring",
            Self::Reconciling => "reconciling",
            Self::Patching => "patching",
            Self::Generating => "generating",
            Self::Validating => "validating",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why generation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    UnsupportedGame,
    /// No enabled mods and loose files are off.
    NothingToLoad,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedGame => f.write_str("No supported game was found in this directory"),
            Self::NothingToLoad => {
                f.write_str("No mods were found, and .parless paths are disabled")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Aborted(AbortReason),
}

/// Run-wide flags.
#[derive(Debug, Clone, Builder)]
pub struct RunOptions {
    /// Skip the update check and the final prompt.
    #[builder(setters(name = with_silent), default = false)]
    silent: bool,
    #[builder(setters(name = with_probe_timeout), default = DEFAULT_PROBE_TIMEOUT)]
    probe_timeout: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RunOptions {
    #[must_use]
    pub const fn silent(&self) -> bool {
        self.silent
    }

    #[must_use]
    pub const fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Phases entered, in order, ending with `Done` or `Aborted`.
    pub phases: Vec<Phase>,
    pub outcome: RunOutcome,
    /// The reconciled list (after persistence).
    pub mods: ModList,
    /// `None` when no update check was started.
    pub update: Option<ProbeOutcome>,
    pub game: Game,
    pub game_exe: Option<PathBuf>,
    pub config_status: LoadStatus,
    pub patches: Vec<PatchAction>,
    pub missing: MissingComponents,
}

impl RunReport {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self.outcome, RunOutcome::Completed)
    }
}

/// Drives one run over a game directory.
pub struct Pipeline {
    layout: GameLayout,
    options: RunOptions,
    detector: Box<dyn GameDetector>,
    validator: Box<dyn ExecutableValidator>,
    generator: Box<dyn LoadOrderGenerator>,
    repacker: Box<dyn Repacker>,
    releases: Arc<dyn ReleaseSource>,
    reporter: Box<dyn Reporter>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("layout", &self.layout)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// State carried from one phase to the next.
struct RunState {
    config: VersionedConfig,
    settings: RunSettings,
    game: Game,
    game_exe: Option<PathBuf>,
    probe: Option<UpdateProbe>,
    phases: Vec<Phase>,
    mods: ModList,
    patches: Vec<PatchAction>,
}

impl Pipeline {
    /// A pipeline with the default collaborators for `layout`.
    #[must_use]
    pub fn new(layout: GameLayout, options: RunOptions) -> Self {
        Self {
            detector: Box::new(ExecutableScanDetector::new(layout.root())),
            validator: Box::new(DigestValidator::new()),
            generator: Box::new(ListingGenerator::new(&layout)),
            repacker: Box::new(ParlessRepacker::new(&layout)),
            releases: Arc::new(GitHubReleases::new()),
            reporter: Box::new(ConsoleReporter),
            layout,
            options,
        }
    }

    #[must_use]
    pub fn with_detector(mut self, detector: impl GameDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: impl ExecutableValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    #[must_use]
    pub fn with_generator(mut self, generator: impl LoadOrderGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    #[must_use]
    pub fn with_repacker(mut self, repacker: impl Repacker + 'static) -> Self {
        self.repacker = Box::new(repacker);
        self
    }

    #[must_use]
    pub fn with_release_source(mut self, releases: Arc<dyn ReleaseSource>) -> Self {
        self.releases = releases;
        self
    }

    #[must_use]
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    #[must_use]
    pub const fn layout(&self) -> &GameLayout {
        &self.layout
    }

    /// Runs every phase.
    ///
    /// An abort is a normal outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or saved, a list
    /// file cannot be read or written, a patch fails, or a collaborator fails
    /// during generation.
    pub async fn run(&self) -> Result<RunReport> {
        let mut state = self.configure()?;
        self.advance(&mut state);
        self.reconcile(&mut state)?;
        self.advance(&mut state);
        self.patch(&mut state)?;
        self.advance(&mut state);

        if let Some(reason) = self.generate(&state)? {
            self.enter(&mut state, Phase::Aborted);
            self.reporter.warn(&format!("Aborting: {reason}"));
            if let Some(probe) = state.probe.take() {
                probe.abandon();
            }
            self.finish();
            return Ok(self.report(state, RunOutcome::Aborted(reason), None));
        }

        self.advance(&mut state);
        let missing = self.validate(&state);
        let update = match state.probe.take() {
            Some(probe) => {
                self.reporter.info("Checking for updates...");
                let outcome = probe.join(self.options.probe_timeout()).await;
                for line in outcome.messages() {
                    self.reporter.info(&line);
                }
                Some(outcome)
            }
            None => None,
        };

        self.advance(&mut state);
        self.finish();
        let mut report = self.report(state, RunOutcome::Completed, update);
        report.missing = missing;
        Ok(report)
    }

    /// Moves to the phase that follows the current one on success.
    fn advance(&self, state: &mut RunState) {
        if let Some(next) = state.phases.last().copied().and_then(Phase::next) {
            self.enter(state, next);
        }
    }

    fn enter(&self, state: &mut RunState, phase: Phase) {
        debug!(%phase, "entering phase");
        state.phases.push(phase);
    }

    /// Reports at info level when `Verbose` is set, otherwise only logs.
    fn detail(&self, state: &RunState, message: &str) {
        if state.settings.verbose {
            self.reporter.info(message);
        } else {
            debug!("{message}");
        }
    }

    fn finish(&self) {
        if !self.options.silent() {
            self.reporter.acknowledge();
        }
    }

    fn report(&self, state: RunState, outcome: RunOutcome, update: Option<ProbeOutcome>) -> RunReport {
        RunReport {
            phases: state.phases,
            outcome,
            mods: state.mods,
            update,
            game: state.game,
            game_exe: state.game_exe,
            config_status: state.config.status(),
            patches: state.patches,
            missing: MissingComponents::empty(),
        }
    }

    fn configure(&self) -> Result<RunState> {
        debug!(phase = %Phase::Configuring, "entering phase");
        let config = VersionedConfig::load(self.layout.ini())
            .with_context(|| format!("failed to load {INI_FILE}"))?;

        match config.status() {
            LoadStatus::Created => self
                .reporter
                .info(&format!("{INI_FILE} was not found. Created a new one with default values.")),
            LoadStatus::Upgraded { .. } => self.reporter.info(&format!(
                "Updated {INI_FILE} to version {}",
                VersionedConfig::CURRENT_VERSION
            )),
            LoadStatus::Current => {}
        }

        let settings = RunSettings::from_config(&config);
        let game = self.detector.detect_game();
        let game_exe = self.detector.game_exe();

        let mods_dir = self.layout.mods_dir();
        if game.is_supported() && !mods_dir.is_dir() {
            self.reporter
                .info(&format!("\"{MODS_DIR}\" folder was not found. Creating empty folder..."));
            std::fs::create_dir_all(&mods_dir).map_err(|e| FsError::io(&mods_dir, e))?;
        }

        let probe = (settings.check_for_updates && !self.options.silent())
            .then(|| UpdateProbe::spawn(Arc::clone(&self.releases)));

        let state = RunState {
            config,
            settings,
            game,
            game_exe,
            probe,
            phases: vec![Phase::Configuring],
            mods: ModList::new(),
            patches: Vec::new(),
        };
        self.detail(&state, &format!("Detected game: {game}"));
        Ok(state)
    }

    fn reconcile(&self, state: &mut RunState) -> Result<()> {
        let mut reconciliation = reconcile(&state.config, &self.layout, state.settings.external_mods_only)
            .context("failed to build the mod list")?;

        let persisted = persist_mod_list(&mut reconciliation, &mut state.config, &self.layout)
            .context("failed to save the mod list")?;
        self.report_cleanup(persisted.cleanup.as_ref());

        if reconciliation.is_external_only() && state.game.is_judgment_series() {
            self.disable_rebuild_mlo(
                state,
                "Disabling RebuildMLO for Judgment and Lost Judgment when using an external mod manager",
            )?;
        }

        let platform_variant = state
            .game_exe
            .as_deref()
            .is_some_and(|exe| self.detector.is_platform_variant(exe));
        if platform_variant {
            self.disable_rebuild_mlo(state, "Disabling RebuildMLO for the store version of the game")?;
        }

        for entry in &reconciliation.mods {
            self.detail(state, &format!("Mod: {entry}"));
        }
        state.mods = reconciliation.mods;
        Ok(())
    }

    fn report_cleanup(&self, cleanup: Option<&CleanupOutcome>) {
        if let Some(CleanupOutcome::LegacyFileKept { error }) = cleanup {
            debug!(%error, "legacy list cleanup failed");
            self.reporter.warn(&format!(
                "Could not delete {LEGACY_LIST_FILE}. This file should be deleted manually."
            ));
        }
    }

    /// Sets `RebuildMLO=0` if the key is present and saves immediately.
    fn disable_rebuild_mlo(&self, state: &mut RunState, message: &str) -> Result<()> {
        let key = ConfigKey::REBUILD_MLO;
        if !state.config.contains(key.section, key.key) {
            return Ok(());
        }
        self.reporter.info(&format!("Game specific patch: {message}"));
        state
            .config
            .set_and_save(key, false)
            .context("failed to save RebuildMLO override")?;
        state.settings.rebuild_mlo = false;
        Ok(())
    }

    fn patch(&self, state: &mut RunState) -> Result<()> {
        let actions = apply_game_patches(state.game, &self.layout)
            .with_context(|| format!("failed to apply patches for {}", state.game))?;

        for action in &actions {
            match action {
                PatchAction::MissingFile(path) => self.reporter.warn(&format!(
                    "{} was not found. Judgment games will NOT load mods without this file. \
                     Please redownload Ryu Mod Manager.",
                    path.file_name().map_or_else(
                        || path.display().to_string(),
                        |n| n.to_string_lossy().into_owned()
                    )
                )),
                other => self.reporter.info(&format!("Game specific patch: {other}")),
            }
        }
        state.patches = actions;
        Ok(())
    }

    /// Returns the abort reason, or `None` once generation ran.
    fn generate(&self, state: &RunState) -> Result<Option<AbortReason>> {
        if !state.game.is_supported() {
            return Ok(Some(AbortReason::UnsupportedGame));
        }

        let names = state.mods.enabled_names();
        if names.is_empty() && !state.settings.loose_files_enabled {
            return Ok(Some(AbortReason::NothingToLoad));
        }

        let load_order = self.layout.load_order();
        if load_order.is_file() {
            self.detail(state, "Removing old MLO...");
            std::fs::remove_file(&load_order).map_err(|e| FsError::io(&load_order, e))?;
        }

        self.repacker
            .remove_stale_artifacts()
            .context("failed to remove repacked archives")?;

        let request = GenerationRequest {
            mods: names,
            loose_files: state.settings.loose_files_enabled,
            rebuild_mlo: state.settings.rebuild_mlo,
        };
        self.reporter.info(&format!(
            "Generating load order for {} mod(s)...",
            request.mods.len()
        ));
        self.generator
            .generate(&request)
            .context("failed to generate the load order")?;
        Ok(None)
    }

    fn validate(&self, state: &RunState) -> MissingComponents {
        let missing = missing_components(&self.layout);
        if missing.contains(MissingComponents::LOADER_DLL) {
            self.reporter.warn(&format!(
                "\"{DINPUT8_DLL}\" is missing from this directory. \
                 RyuModManager will NOT function properly without this file"
            ));
        }
        if missing.contains(MissingComponents::PARLESS_ASI) {
            self.reporter.warn(&format!(
                "\"{ASI_FILE}\" is missing from this directory. \
                 RyuModManager will NOT function properly without this file"
            ));
        }

        if state.settings.show_warnings
            && let Some(exe) = state.game_exe.as_deref()
        {
            if self.detector.is_platform_variant(exe) {
                self.reporter.warn(
                    "Store version of the game detected. Some features have been disabled.",
                );
            }
            if !self.validator.validate(exe, state.game) {
                self.reporter.warn(
                    "Game version is unsupported. Please use the latest Steam version of the game.",
                );
                self.reporter.warn(
                    "RyuModManager will still generate the load order, \
                     but the game might CRASH or not function properly",
                );
            }
        }
        missing
    }
}
