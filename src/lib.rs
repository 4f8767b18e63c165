// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)           pipeline
//!                            Configuring -> ... -> Done
//!                                      |
//!          +-----------+---------------+-------------+
//!          v           v               v             v
//!       config      modlist          game          update
//!     INI, versions  legacy/current  detect, patch  release probe
//!     GameLayout     scan/reconcile  validate       reqwest
//!                    migration
//!
//!   +-----------------------------------------+
//!   |  foundation   error, logging, utility   |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod modlist;
pub mod pipeline;
pub mod update;
pub mod utility;
