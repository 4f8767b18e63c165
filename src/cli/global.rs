// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Options shared by every invocation.
//!
//! ```text
//! -d/--game-dir DIR  <- game root holding the exe and YakuzaParless.ini
//! -l/--log-level N   <- console verbosity (0-5)
//! --log-file FILE    <- also log to FILE (at debug unless -l is higher)
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::config::paths::GameLayout;
use crate::logging::{LogConfig, LogLevel};

/// Global options.
#[derive(Debug, Clone, Args)]
pub struct GlobalOptions {
    /// Game directory (defaults to the current directory).
    #[arg(short = 'd', long = "game-dir", value_name = "DIR", env = "RMM_GAME_DIR", default_value = ".")]
    pub game_dir: PathBuf,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=5)
    )]
    pub log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            game_dir: PathBuf::from("."),
            log_level: None,
            log_file: None,
        }
    }
}

impl GlobalOptions {
    #[must_use]
    pub fn layout(&self) -> GameLayout {
        GameLayout::new(&self.game_dir)
    }

    /// Logging setup for these options.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        let console_level = self
            .log_level
            .and_then(LogLevel::from_u8)
            .unwrap_or(LogLevel::INFO);
        let file_level = console_level.max(LogLevel::DEBUG);

        LogConfig::builder()
            .with_console_level(console_level)
            .with_file_level(file_level)
            .maybe_with_log_file(self.log_file.as_ref().map(|p| p.display().to_string()))
            .build()
    }
}
