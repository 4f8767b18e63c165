// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Utility modules.
//!
//! ```text
//! encoding
//!   detect_encoding()  BOM / UTF-8 / Windows-1252
//!   decode_text()      whole-file decode to UTF-8
//! ```

pub mod encoding;
