// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Game identity, detection and executable checks.
//!
//! ```text
//! game root
//!   <Stem>.exe ---ExecutableScanDetector---> Game (or Unsupported)
//!        |                                   game_exe()
//!        |                                   is_platform_variant()
//!        '-------DigestValidator-----------> MZ header [+ SHA-256]
//!
//! dinput8.dll / version.dll / winmm.dll / YakuzaParless.asi
//!        '-------missing_components()------> MissingComponents
//! ```
//!
//! Detection and validation sit behind [`GameDetector`] and
//! [`ExecutableValidator`] so the pipeline can run against fakes.

pub mod patches;


use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use bitflags::bitflags;
use sha2::{Digest, Sha256};
use tracing::{debug, trace};

use crate::config::paths::GameLayout;
use crate::error::{ProcessError, RmmResult};

/// Directory names used by store installs that ship a locked-down executable.
const PLATFORM_VARIANT_DIRS: &[&str] = &["WindowsApps", "XboxGames"];

/// Manifest placed next to store-distributed executables.
const PLATFORM_VARIANT_MANIFEST: &str = "MicrosoftGame.config";

/// A game the loader knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Game {
    #[default]
    Unsupported,
    Yakuza0,
    YakuzaKiwami,
    YakuzaKiwami2,
    Yakuza3,
    Yakuza4,
    Yakuza5,
    Yakuza6,
    YakuzaLikeADragon,
    Judgment,
    LostJudgment,
    /// Virtua Fighter 5 Ultimate Showdown.
    Eve,
}

impl Game {
    /// Every supported game, in detection order.
    pub const SUPPORTED: &[Self] = &[
        Self::Yakuza0,
        Self::YakuzaKiwami,
        Self::YakuzaKiwami2,
        Self::Yakuza3,
        Self::Yakuza4,
        Self::Yakuza5,
        Self::Yakuza6,
        Self::YakuzaLikeADragon,
        Self::Judgment,
        Self::LostJudgment,
        Self::Eve,
    ];

    /// File stem of the game's executable.
    #[must_use]
    pub const fn exe_stem(self) -> Option<&'static str> {
        match self {
            Self::Unsupported => None,
            Self::Yakuza0 => Some("Yakuza0"),
            Self::YakuzaKiwami => Some("YakuzaKiwami"),
            Self::YakuzaKiwami2 => Some("YakuzaKiwami2"),
            Self::Yakuza3 => Some("Yakuza3"),
            Self::Yakuza4 => Some("Yakuza4"),
            Self::Yakuza5 => Some("Yakuza5"),
            Self::Yakuza6 => Some("Yakuza6"),
            Self::YakuzaLikeADragon => Some("YakuzaLikeADragon"),
            Self::Judgment => Some("Judgment"),
            Self::LostJudgment => Some("LostJudgment"),
            Self::Eve => Some("eve"),
        }
    }

    /// Maps an executable file name (with or without `.exe`) to a game.
    #[must_use]
    pub fn from_exe_name(name: &str) -> Self {
        let stem = name
            .len()
            .checked_sub(4)
            .filter(|&i| name.is_char_boundary(i) && name[i..].eq_ignore_ascii_case(".exe"))
            .map_or(name, |i| &name[..i]);

        Self::SUPPORTED
            .iter()
            .copied()
            .find(|g| g.exe_stem().is_some_and(|s| s.eq_ignore_ascii_case(stem)))
            .unwrap_or(Self::Unsupported)
    }

    #[must_use]
    pub const fn is_supported(self) -> bool {
        !matches!(self, Self::Unsupported)
    }

    /// Judgment and Lost Judgment share loader quirks.
    #[must_use]
    pub const fn is_judgment_series(self) -> bool {
        matches!(self, Self::Judgment | Self::LostJudgment)
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Unsupported => "Unsupported",
            Self::Yakuza0 => "Yakuza 0",
            Self::YakuzaKiwami => "Yakuza Kiwami",
            Self::YakuzaKiwami2 => "Yakuza Kiwami 2",
            Self::Yakuza3 => "Yakuza 3 Remastered",
            Self::Yakuza4 => "Yakuza 4 Remastered",
            Self::Yakuza5 => "Yakuza 5 Remastered",
            Self::Yakuza6 => "Yakuza 6: The Song of Life",
            Self::YakuzaLikeADragon => "Yakuza: Like a Dragon",
            Self::Judgment => "Judgment",
            Self::LostJudgment => "Lost Judgment",
            Self::Eve => "Virtua Fighter 5 Ultimate Showdown",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Finds the game installed in a directory.
pub trait GameDetector: Send + Sync {
    /// The game in the root directory, or [`Game::Unsupported`].
    fn detect_game(&self) -> Game;

    /// Path of the detected game's executable.
    fn game_exe(&self) -> Option<PathBuf>;

    /// Whether `exe` belongs to a store build that needs features turned off.
    fn is_platform_variant(&self, exe: &Path) -> bool;
}

/// Looks for a known executable name directly in the game root.
#[derive(Debug, Clone)]
pub struct ExecutableScanDetector {
    root: PathBuf,
}

impl ExecutableScanDetector {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn find(&self) -> Option<(Game, PathBuf)> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(root = %self.root.display(), error = %e, "cannot list game root");
                return None;
            }
        };

        let mut found: Vec<(Game, PathBuf)> = entries
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let name = entry.file_name();
                let game = Game::from_exe_name(name.to_str()?);
                game.is_supported().then(|| (game, entry.path()))
            })
            .collect();

        // Stable choice when several executables are present.
        found.sort_by_key(|(game, _)| Game::SUPPORTED.iter().position(|g| g == game));
        found.into_iter().next()
    }
}

impl GameDetector for ExecutableScanDetector {
    fn detect_game(&self) -> Game {
        let game = self.find().map_or(Game::Unsupported, |(game, _)| game);
        debug!(%game, "detected game");
        game
    }

    fn game_exe(&self) -> Option<PathBuf> {
        self.find().map(|(_, exe)| exe)
    }

    fn is_platform_variant(&self, exe: &Path) -> bool {
        let under_store_dir = exe.ancestors().any(|dir| {
            dir.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| PLATFORM_VARIANT_DIRS.iter().any(|d| d.eq_ignore_ascii_case(n)))
        });
        let has_manifest = exe
            .parent()
            .is_some_and(|dir| dir.join(PLATFORM_VARIANT_MANIFEST).is_file());
        under_store_dir || has_manifest
    }
}

/// Decides whether an executable is an unmodified build the loader supports.
pub trait ExecutableValidator: Send + Sync {
    fn validate(&self, exe: &Path, game: Game) -> bool;
}

/// Checks the PE header and, when reference digests are known for the game,
/// the executable's SHA-256.
#[derive(Debug, Clone, Default)]
pub struct DigestValidator {
    digests: HashMap<Game, Vec<String>>,
}

impl DigestValidator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an accepted SHA-256 (hex) for `game`.
    #[must_use]
    pub fn with_digest(mut self, game: Game, sha256: &str) -> Self {
        self.digests
            .entry(game)
            .or_default()
            .push(sha256.to_ascii_lowercase());
        self
    }

    fn sha256_hex(exe: &Path) -> std::io::Result<String> {
        let mut file = std::fs::File::open(exe)?;
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; 8192];
        loop {
            let read = file.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }
        Ok(format!("{:x}", hasher.finalize()))
    }

    fn has_pe_header(exe: &Path) -> bool {
        let mut magic = [0u8; 2];
        let read = std::fs::File::open(exe).and_then(|mut f| f.read_exact(&mut magic));
        read.is_ok() && &magic == b"MZ"
    }
}

impl ExecutableValidator for DigestValidator {
    fn validate(&self, exe: &Path, game: Game) -> bool {
        if !Self::has_pe_header(exe) {
            debug!(exe = %exe.display(), "missing PE header");
            return false;
        }

        let Some(known) = self.digests.get(&game).filter(|d| !d.is_empty()) else {
            return true;
        };
        match Self::sha256_hex(exe) {
            Ok(actual) => {
                trace!(%actual, "executable digest");
                known.contains(&actual)
            }
            Err(e) => {
                debug!(exe = %exe.display(), error = %e, "cannot hash executable");
                false
            }
        }
    }
}

bitflags! {
    /// Loader files missing from the game root.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MissingComponents: u8 {
        /// None of `dinput8.dll`, `version.dll` or `winmm.dll` exists.
        const LOADER_DLL = 0x01;

        /// `YakuzaParless.asi` does not exist.
        const PARLESS_ASI = 0x02;
    }
}

/// Checks the loader files in `layout`.
#[must_use]
pub fn missing_components(layout: &GameLayout) -> MissingComponents {
    let mut missing = MissingComponents::empty();
    let has_dll = [
        layout.dinput8_dll(),
        layout.version_dll(),
        layout.winmm_dll(),
    ]
    .iter()
    .any(|p| p.is_file());
    if !has_dll {
        missing |= MissingComponents::LOADER_DLL;
    }
    if !layout.asi().is_file() {
        missing |= MissingComponents::PARLESS_ASI;
    }
    missing
}

/// Starts the game without waiting for it, with the game root as working
/// directory.
///
/// # Errors
///
/// Returns `ProcessError::SpawnFailed` if the executable cannot be started.
pub fn launch(exe: &Path) -> RmmResult<()> {
    let mut command = tokio::process::Command::new(exe);
    if let Some(dir) = exe.parent().filter(|d| !d.as_os_str().is_empty()) {
        command.current_dir(dir);
    }
    let child = command.spawn().map_err(|source| ProcessError::SpawnFailed {
        command: exe.display().to_string(),
        source,
    })?;
    debug!(pid = ?child.id(), exe = %exe.display(), "game launched");
    Ok(())
}
