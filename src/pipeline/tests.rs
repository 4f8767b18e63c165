// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::collaborators::{
    GenerationRequest, ListingGenerator, LoadOrderGenerator, ParlessRepacker, Repacker,
};
use super::reporter::Reporter;
use super::{AbortReason, Phase, Pipeline, RunOptions, RunOutcome};
use crate::config::VersionedConfig;
use crate::config::defaults::ConfigKey;
use crate::config::paths::GameLayout;
use crate::error::Result;
use crate::game::{ExecutableValidator, Game, GameDetector, MissingComponents};
use crate::modlist::migration::{CleanupOutcome, PendingMigration};
use crate::update::{ProbeOutcome, ReleaseLookup, ReleaseSource};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

// =============================================================================
// Fakes
// =============================================================================

#[derive(Clone)]
struct FakeDetector {
    game: Game,
    exe: Option<PathBuf>,
    platform_variant: bool,
}

impl GameDetector for FakeDetector {
    fn detect_game(&self) -> Game {
        self.game
    }

    fn game_exe(&self) -> Option<PathBuf> {
        self.exe.clone()
    }

    fn is_platform_variant(&self, _exe: &Path) -> bool {
        self.platform_variant
    }
}

struct FixedValidator(bool);

impl ExecutableValidator for FixedValidator {
    fn validate(&self, _exe: &Path, _game: Game) -> bool {
        self.0
    }
}

/// Records each request and whether the stale artifact was already gone.
#[derive(Clone, Default)]
struct RecordingGenerator {
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    stale_artifact_seen: Arc<Mutex<Vec<bool>>>,
    load_order: PathBuf,
}

impl LoadOrderGenerator for RecordingGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<()> {
        self.stale_artifact_seen
            .lock()
            .unwrap()
            .push(self.load_order.exists());
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
struct CountingRepacker {
    calls: Arc<AtomicUsize>,
}

impl Repacker for CountingRepacker {
    fn remove_stale_artifacts(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Clone, Default)]
struct RecordingReporter {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingReporter {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    fn has(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.lines.lock().unwrap().push(format!("info: {message}"));
    }

    fn warn(&self, message: &str) {
        self.lines.lock().unwrap().push(format!("warn: {message}"));
    }

    fn acknowledge(&self) {
        self.lines.lock().unwrap().push("ack".to_string());
    }
}

struct FixedSource(ReleaseLookup);

impl ReleaseSource for FixedSource {
    fn latest_release<'a>(&'a self, _owner: &'a str, _repo: &'a str) -> BoxFuture<'a, ReleaseLookup> {
        futures_util::future::ready(self.0.clone()).boxed()
    }
}

struct NeverSource;

impl ReleaseSource for NeverSource {
    fn latest_release<'a>(&'a self, _owner: &'a str, _repo: &'a str) -> BoxFuture<'a, ReleaseLookup> {
        futures_util::future::pending().boxed()
    }
}

// =============================================================================
// Harness
// =============================================================================

struct Harness {
    _dir: TempDir,
    layout: GameLayout,
    generator: RecordingGenerator,
    repacker: CountingRepacker,
    reporter: RecordingReporter,
}

impl Harness {
    fn new(mods: &[&str]) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let layout = GameLayout::new(dir.path());
        fs::create_dir_all(layout.mods_dir()).unwrap();
        for name in mods {
            fs::create_dir_all(layout.mod_dir(name)).unwrap();
        }
        let generator = RecordingGenerator {
            load_order: layout.load_order(),
            ..RecordingGenerator::default()
        };
        Self {
            _dir: dir,
            layout,
            generator,
            repacker: CountingRepacker::default(),
            reporter: RecordingReporter::default(),
        }
    }

    fn exe(&self, game: Game) -> PathBuf {
        let exe = self
            .layout
            .root()
            .join(format!("{}.exe", game.exe_stem().unwrap()));
        fs::write(&exe, b"MZ").unwrap();
        exe
    }

    fn set_config(&self, values: &[(ConfigKey, &str)]) {
        let mut config = VersionedConfig::load(self.layout.ini()).unwrap();
        for (key, value) in values {
            config.set(key.section, key.key, (*value).to_string());
        }
        config.save().unwrap();
    }

    fn config(&self) -> VersionedConfig {
        VersionedConfig::load(self.layout.ini()).unwrap()
    }

    fn pipeline(&self, detector: FakeDetector, options: RunOptions) -> Pipeline {
        Pipeline::new(self.layout.clone(), options)
            .with_detector(detector)
            .with_validator(FixedValidator(true))
            .with_generator(self.generator.clone())
            .with_repacker(self.repacker.clone())
            .with_release_source(Arc::new(FixedSource(ReleaseLookup::NoRelease)))
            .with_reporter(self.reporter.clone())
    }

    fn supported(&self, game: Game) -> FakeDetector {
        FakeDetector {
            game,
            exe: Some(self.exe(game)),
            platform_variant: false,
        }
    }

    fn requests(&self) -> Vec<GenerationRequest> {
        self.generator.requests.lock().unwrap().clone()
    }
}

fn silent() -> RunOptions {
    RunOptions::builder().with_silent(true).build()
}

fn unsupported() -> FakeDetector {
    FakeDetector {
        game: Game::Unsupported,
        exe: None,
        platform_variant: false,
    }
}

// =============================================================================
// Phase
// =============================================================================

#[test]
fn test_phase_order() {
    let mut walked = vec![Phase::Configuring];
    while let Some(next) = walked.last().and_then(|p| p.next()) {
        walked.push(next);
    }
    assert_eq!(walked, Phase::all());
    assert!(Phase::Aborted.is_terminal());
    assert_eq!(Phase::Aborted.next(), None);
}

#[test]
fn test_phase_names() {
    let names: Vec<_> = Phase::all().iter().map(|p| p.name()).collect();
    insta::assert_snapshot!(
        names.join(" -> "),
        @"configuring -> reconciling -> patching -> generating -> validating -> done"
    );
}

#[test]
fn test_run_options_defaults() {
    let options = RunOptions::default();
    assert!(!options.silent());
    assert_eq!(options.probe_timeout(), Duration::from_secs(5));
}

// =============================================================================
// Successful Runs
// =============================================================================

#[tokio::test]
async fn test_run_completes_and_generates() {
    let h = Harness::new(&["B", "A"]);
    let report = h.pipeline(h.supported(Game::Yakuza0), silent()).run().await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.phases, Phase::all());
    assert_eq!(
        h.requests(),
        vec![GenerationRequest {
            mods: vec!["A".into(), "B".into()],
            loose_files: false,
            rebuild_mlo: true,
        }]
    );
    assert_eq!(h.repacker.calls.load(Ordering::SeqCst), 1);
    assert_eq!(fs::read_to_string(h.layout.current_list()).unwrap(), "<A|<B");
    assert_eq!(report.update, None);
    assert!(!h.reporter.has("ack"));
}

#[tokio::test]
async fn test_run_creates_config_and_mods_dir() {
    let dir = tempfile::tempdir().unwrap();
    let layout = GameLayout::new(dir.path());
    let reporter = RecordingReporter::default();
    let exe = dir.path().join("Yakuza3.exe");
    fs::write(&exe, b"MZ").unwrap();

    let report = Pipeline::new(layout.clone(), silent())
        .with_detector(FakeDetector {
            game: Game::Yakuza3,
            exe: Some(exe),
            platform_variant: false,
        })
        .with_reporter(reporter.clone())
        .with_repacker(CountingRepacker::default())
        .with_generator(ListingGenerator::new(&layout))
        .run()
        .await
        .unwrap();

    assert!(layout.ini().is_file());
    assert!(layout.mods_dir().is_dir());
    assert!(reporter.has("YakuzaParless.ini was not found"));
    assert_eq!(report.outcome, RunOutcome::Aborted(AbortReason::NothingToLoad));
}

#[tokio::test]
async fn test_stale_artifact_removed_before_generation() {
    let h = Harness::new(&["A"]);
    fs::write(h.layout.load_order(), b"old").unwrap();

    h.pipeline(h.supported(Game::Yakuza0), silent()).run().await.unwrap();

    assert_eq!(*h.generator.stale_artifact_seen.lock().unwrap(), vec![false]);
}

#[tokio::test]
async fn test_loose_files_allow_empty_list() {
    let h = Harness::new(&[]);
    h.set_config(&[(ConfigKey::LOOSE_FILES_ENABLED, "1")]);

    let report = h.pipeline(h.supported(Game::Yakuza0), silent()).run().await.unwrap();

    assert!(report.is_completed());
    let requests = h.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].mods.is_empty());
    assert!(requests[0].loose_files);
    assert!(!h.layout.current_list().exists());
}

#[tokio::test]
async fn test_disabled_mods_are_not_generated() {
    let h = Harness::new(&["A", "B"]);
    fs::write(h.layout.current_list(), ">A|<B").unwrap();

    h.pipeline(h.supported(Game::Yakuza0), silent()).run().await.unwrap();

    assert_eq!(h.requests()[0].mods, vec!["B".to_string()]);
    assert_eq!(fs::read_to_string(h.layout.current_list()).unwrap(), ">A|<B");
}

// =============================================================================
// Aborts
// =============================================================================

#[tokio::test]
async fn test_unsupported_game_aborts() {
    let h = Harness::new(&["A"]);
    fs::write(h.layout.load_order(), b"old").unwrap();

    let report = h
        .pipeline(unsupported(), RunOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(
        report.outcome,
        RunOutcome::Aborted(AbortReason::UnsupportedGame)
    );
    assert_eq!(
        report.phases,
        vec![
            Phase::Configuring,
            Phase::Reconciling,
            Phase::Patching,
            Phase::Generating,
            Phase::Aborted,
        ]
    );
    assert!(h.requests().is_empty());
    assert_eq!(h.repacker.calls.load(Ordering::SeqCst), 0);
    assert!(h.layout.load_order().exists());
    assert!(h.reporter.has("warn: Aborting: No supported game was found in this directory"));
    assert_eq!(h.reporter.lines().last().map(String::as_str), Some("ack"));
    assert_eq!(report.update, None);
}

#[tokio::test]
async fn test_empty_list_aborts() {
    let h = Harness::new(&[]);

    let report = h.pipeline(h.supported(Game::Yakuza0), silent()).run().await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Aborted(AbortReason::NothingToLoad));
    assert!(h.reporter.has("Aborting: No mods were found, and .parless paths are disabled"));
    assert!(!h.reporter.has("ack"));
}

#[tokio::test]
async fn test_all_disabled_aborts() {
    let h = Harness::new(&["A"]);
    fs::write(h.layout.current_list(), ">A").unwrap();

    let report = h.pipeline(h.supported(Game::Yakuza0), silent()).run().await.unwrap();
    assert_eq!(report.outcome, RunOutcome::Aborted(AbortReason::NothingToLoad));
}

// =============================================================================
// Migration and Overrides
// =============================================================================

#[tokio::test]
async fn test_legacy_migration_runs_once() {
    let h = Harness::new(&["A", "B", "C"]);
    fs::write(h.layout.legacy_list(), "A\nB\n;comment\nMissing\n").unwrap();

    let report = h.pipeline(h.supported(Game::Yakuza0), silent()).run().await.unwrap();

    assert!(!h.layout.legacy_list().exists());
    assert!(h.config().value(ConfigKey::MOD_LIST_IMPORTED, false));
    assert_eq!(fs::read_to_string(h.layout.current_list()).unwrap(), "<A|<B|>C");
    assert_eq!(report.mods.enabled_names(), vec!["A", "B"]);

    // A legacy file reappearing after import is ignored.
    fs::write(h.layout.legacy_list(), "C\n").unwrap();
    h.pipeline(h.supported(Game::Yakuza0), silent()).run().await.unwrap();
    assert_eq!(fs::read_to_string(h.layout.current_list()).unwrap(), "<A|<B|>C");
    assert!(h.layout.legacy_list().exists());
}

#[test]
fn test_undeletable_legacy_file_warns_once() {
    let h = Harness::new(&[]);
    let blocked = h.layout.root().join("ModLoadOrder.d");
    fs::create_dir_all(blocked.join("inner")).unwrap();
    let mut config = h.config();
    let outcome = PendingMigration::new(&blocked).complete(&mut config).unwrap();

    let pipeline = h.pipeline(h.supported(Game::Yakuza0), silent());
    pipeline.report_cleanup(Some(&outcome));
    pipeline.report_cleanup(Some(&CleanupOutcome::Completed));
    pipeline.report_cleanup(None);

    assert_eq!(
        h.reporter.lines(),
        vec!["warn: Could not delete ModLoadOrder.txt. This file should be deleted manually."]
    );
    assert!(h.config().value(ConfigKey::MOD_LIST_IMPORTED, false));
}

#[tokio::test]
async fn test_external_only_judgment_disables_rebuild() {
    let h = Harness::new(&["A", "_externalMods"]);
    fs::write(h.layout.current_list(), "<A").unwrap();
    h.set_config(&[(ConfigKey::LOAD_EXTERNAL_MODS_ONLY, "1")]);

    let report = h.pipeline(h.supported(Game::Judgment), silent()).run().await.unwrap();

    assert!(report.is_completed());
    assert_eq!(
        h.requests(),
        vec![GenerationRequest {
            mods: vec!["_externalMods".into()],
            loose_files: false,
            rebuild_mlo: false,
        }]
    );
    assert!(!h.config().value(ConfigKey::REBUILD_MLO, true));
    assert_eq!(fs::read_to_string(h.layout.current_list()).unwrap(), "<A");
}

#[tokio::test]
async fn test_external_only_other_game_keeps_rebuild() {
    let h = Harness::new(&["_externalMods"]);
    h.set_config(&[(ConfigKey::LOAD_EXTERNAL_MODS_ONLY, "1")]);

    h.pipeline(h.supported(Game::Yakuza6), silent()).run().await.unwrap();

    assert!(h.requests()[0].rebuild_mlo);
    assert!(h.config().value(ConfigKey::REBUILD_MLO, false));
}

#[tokio::test]
async fn test_platform_variant_disables_rebuild() {
    let h = Harness::new(&["A"]);
    let mut detector = h.supported(Game::YakuzaLikeADragon);
    detector.platform_variant = true;

    h.pipeline(detector, silent()).run().await.unwrap();

    assert!(!h.requests()[0].rebuild_mlo);
    assert!(!h.config().value(ConfigKey::REBUILD_MLO, true));
    assert!(h.reporter.has("Store version of the game detected"));
}

#[tokio::test]
async fn test_rebuild_override_skipped_without_key() {
    let h = Harness::new(&["A"]);
    fs::write(h.layout.ini(), "[Parless]\nIniVersion=4\n").unwrap();
    let mut detector = h.supported(Game::Yakuza0);
    detector.platform_variant = true;

    h.pipeline(detector, silent()).run().await.unwrap();

    assert!(!h.config().contains("Overrides", "RebuildMLO"));
    assert!(h.requests()[0].rebuild_mlo);
}

// =============================================================================
// Patching and Validation
// =============================================================================

#[tokio::test]
async fn test_eve_patch_applied() {
    let h = Harness::new(&["A"]);
    fs::write(h.layout.dinput8_dll(), b"loader").unwrap();

    let report = h.pipeline(h.supported(Game::Eve), silent()).run().await.unwrap();

    assert_eq!(report.patches.len(), 1);
    assert!(h.layout.version_dll().is_file());
    assert!(!h.layout.dinput8_dll().exists());
    assert!(report.missing.contains(MissingComponents::PARLESS_ASI));
    assert!(!report.missing.contains(MissingComponents::LOADER_DLL));
}

#[tokio::test]
async fn test_judgment_missing_spoofer_warns() {
    let h = Harness::new(&["A"]);

    h.pipeline(h.supported(Game::LostJudgment), silent()).run().await.unwrap();

    assert!(h.reporter.has("warn: winmm.lj was not found"));
}

#[tokio::test]
async fn test_validation_warnings() {
    let h = Harness::new(&["A"]);

    let report = h
        .pipeline(h.supported(Game::Yakuza0), silent())
        .with_validator(FixedValidator(false))
        .run()
        .await
        .unwrap();

    assert_eq!(report.missing, MissingComponents::all());
    assert!(h.reporter.has("warn: \"dinput8.dll\" is missing"));
    assert!(h.reporter.has("warn: \"YakuzaParless.asi\" is missing"));
    assert!(h.reporter.has("Game version is unsupported"));
}

#[tokio::test]
async fn test_show_warnings_off_hides_exe_warning() {
    let h = Harness::new(&["A"]);
    h.set_config(&[(ConfigKey::SHOW_WARNINGS, "0")]);
    fs::write(h.layout.winmm_dll(), b"").unwrap();
    fs::write(h.layout.asi(), b"").unwrap();

    let report = h
        .pipeline(h.supported(Game::Yakuza0), silent())
        .with_validator(FixedValidator(false))
        .run()
        .await
        .unwrap();

    assert!(report.missing.is_empty());
    assert!(!h.reporter.lines().iter().any(|l| l.starts_with("warn:")));
}

#[tokio::test]
async fn test_verbose_lists_mods() {
    let h = Harness::new(&["A"]);
    h.set_config(&[(ConfigKey::VERBOSE, "1")]);

    h.pipeline(h.supported(Game::Yakuza0), silent()).run().await.unwrap();

    assert!(h.reporter.has("info: Mod: A (enabled)"));
}

// =============================================================================
// Update Probe
// =============================================================================

#[tokio::test]
async fn test_probe_result_reported_before_acknowledge() {
    let h = Harness::new(&["A"]);

    let report = h
        .pipeline(h.supported(Game::Yakuza0), RunOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(report.update, Some(ProbeOutcome::UpToDate));
    let lines = h.reporter.lines();
    let checked = lines.iter().position(|l| l == "info: Current version is up to date");
    let ack = lines.iter().position(|l| l == "ack");
    assert!(checked.is_some() && ack.is_some() && checked < ack);
}

#[tokio::test]
async fn test_probe_disabled_by_config() {
    let h = Harness::new(&["A"]);
    h.set_config(&[(ConfigKey::CHECK_FOR_UPDATES, "0")]);

    let report = h
        .pipeline(h.supported(Game::Yakuza0), RunOptions::default())
        .run()
        .await
        .unwrap();

    assert_eq!(report.update, None);
    assert!(h.reporter.has("ack"));
}

#[tokio::test]
async fn test_probe_timeout_is_reported() {
    let h = Harness::new(&["A"]);
    let options = RunOptions::builder()
        .with_probe_timeout(Duration::from_millis(20))
        .build();

    let report = h
        .pipeline(h.supported(Game::Yakuza0), options)
        .with_release_source(Arc::new(NeverSource))
        .run()
        .await
        .unwrap();

    assert_eq!(report.update, Some(ProbeOutcome::TimedOut));
    assert!(h.reporter.has("info: Unable to check for updates"));
}

// =============================================================================
// Default Collaborators
// =============================================================================

#[test]
fn test_listing_generator_render() {
    let request = GenerationRequest {
        mods: vec!["ModA".into(), "ModB".into()],
        loose_files: true,
        rebuild_mlo: false,
    };
    assert_eq!(
        ListingGenerator::render(&request),
        "; loose_files=1 rebuild_mlo=0\nModA\nModB\n"
    );
}

#[test]
fn test_listing_generator_writes_artifact() {
    let h = Harness::new(&[]);
    let request = GenerationRequest {
        mods: vec!["ModA".into()],
        loose_files: false,
        rebuild_mlo: true,
    };
    ListingGenerator::new(&h.layout).generate(&request).unwrap();
    assert_eq!(
        fs::read_to_string(h.layout.load_order()).unwrap(),
        "; loose_files=0 rebuild_mlo=1\nModA\n"
    );
}

#[test]
fn test_parless_repacker_removes_output() {
    let h = Harness::new(&[]);
    fs::create_dir_all(h.layout.repacked_dir().join("sub")).unwrap();
    let repacker = ParlessRepacker::new(&h.layout);

    repacker.remove_stale_artifacts().unwrap();
    assert!(!h.layout.repacked_dir().exists());
    repacker.remove_stale_artifacts().unwrap();
}
