// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Pipeline::run() --> [-r] launch game
//! ```

use std::process::ExitCode;

use rmm_rs::cli::{self, Cli};
use rmm_rs::error::Result;
use rmm_rs::game::{ExecutableScanDetector, GameDetector, launch};
use rmm_rs::logging::init_logging;
use rmm_rs::pipeline::Pipeline;
use rmm_rs::update::RELEASE_OWNER;
use tracing::{info, warn};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let _log_guard = match init_logging(&cli.global.log_config()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    println!("Ryu Mod Manager v{}", env!("CARGO_PKG_VERSION"));
    println!("By {RELEASE_OWNER}\n");

    let layout = cli.global.layout();
    let report = Pipeline::new(layout.clone(), cli.run_options()).run().await?;
    tracing::debug!(outcome = ?report.outcome, phases = report.phases.len(), "run finished");

    if cli.run {
        let exe = report
            .game_exe
            .or_else(|| ExecutableScanDetector::new(layout.root()).game_exe());
        match exe {
            Some(exe) if exe.is_file() => {
                info!("Launching \"{}\"...", exe.display());
                launch(&exe)?;
            }
            _ => warn!("Could not run game because no game executable was found"),
        }
    }
    Ok(())
}
