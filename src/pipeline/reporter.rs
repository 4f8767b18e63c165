// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! User-facing output of a run.

use std::io::{BufRead, Write};

use tracing::{info, warn};

/// Receives progress messages and handles the final prompt.
pub trait Reporter: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    /// Blocks until the user confirms the run is over.
    fn acknowledge(&self);
}

/// Routes messages through `tracing` and prompts on stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        info!("{message}");
    }

    fn warn(&self, message: &str) {
        warn!("{message}");
    }

    fn acknowledge(&self) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "Program finished. Press Enter to exit...");
        let _ = stdout.flush();
        drop(stdout);

        let mut line = String::new();
        let _ = std::io::stdin().lock().read_line(&mut line);
    }
}
