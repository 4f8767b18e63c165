// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for rmm-rs using clap derive.
//!
//! # Usage
//!
//! ```text
//! rmm [-s] [-r] [global options]
//!   (no flags)    reconcile mods, generate the load order, prompt at exit
//!   -s/--silent   no update check, no prompt
//!   -r/--run      launch the game afterwards
//! ```

pub mod global;


use crate::cli::global::GlobalOptions;
use crate::pipeline::RunOptions;
use clap::Parser;

/// Ryu Mod Manager - Rust Port
///
/// Generates the mod load order for Yakuza and Judgment games.
#[derive(Debug, Parser)]
#[command(
    name = "rmm",
    author,
    version,
    about = "Ryu Mod Manager",
    long_about = "rmm-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Run without arguments from the game directory to reconcile\n\
                  the mods in `mods/` with `ModList.txt` and generate the load\n\
                  order used by Parless.",
    after_help = "CONFIGURATION:\n\n\
                  Settings are read from `YakuzaParless.ini` in the game\n\
                  directory. The file is created with default values when it\n\
                  is missing and upgraded in place when it comes from an older\n\
                  release."
)]
pub struct Cli {
    /// Skips the update check and the exit prompt.
    #[arg(short = 's', long)]
    pub silent: bool,

    /// Launches the game after the load order is generated.
    #[arg(short = 'r', long)]
    pub run: bool,

    /// Global options
    #[command(flatten)]
    pub global: GlobalOptions,
}

impl Cli {
    /// Run-wide options derived from the flags.
    #[must_use]
    pub fn run_options(&self) -> RunOptions {
        RunOptions::builder().with_silent(self.silent).build()
    }
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse_from<I, T>(iter: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(iter)
}
