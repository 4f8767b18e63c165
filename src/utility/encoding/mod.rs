// rmm-rs: Ryu Mod Manager - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Text decoding for files written by older Windows tooling.
//!
//! ```text
//! bytes --BOM?--> UTF-8 / UTF-16LE / UTF-16BE
//!       --valid UTF-8?--> UTF-8 (borrowed)
//!       --otherwise--> Windows-1252
//! ```
//!
//! Uses `encoding_rs`. Invalid sequences → U+FFFD.

use encoding_rs::{UTF_8, WINDOWS_1252};
use std::borrow::Cow;

/// Encoding detected for a text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// UTF-8, with or without BOM
    #[default]
    Utf8,
    /// UTF-16 Little Endian (BOM required)
    Utf16Le,
    /// UTF-16 Big Endian (BOM required)
    Utf16Be,
    /// Active Code Page - Windows-1252
    Acp,
}

/// Works out how `bytes` should be decoded.
///
/// A byte order mark wins; BOM-less input is UTF-8 when it validates and
/// Windows-1252 otherwise.
#[must_use]
pub fn detect_encoding(bytes: &[u8]) -> Encoding {
    match encoding_rs::Encoding::for_bom(bytes) {
        Some((enc, _)) if enc == encoding_rs::UTF_16LE => Encoding::Utf16Le,
        Some((enc, _)) if enc == encoding_rs::UTF_16BE => Encoding::Utf16Be,
        Some(_) => Encoding::Utf8,
        None if std::str::from_utf8(bytes).is_ok() => Encoding::Utf8,
        None => Encoding::Acp,
    }
}

/// Decodes a whole text file into UTF-8, stripping any BOM.
///
/// # Example
/// ```
/// use rmm_rs::utility::encoding::decode_text;
///
/// assert_eq!(decode_text(b"\xEF\xBB\xBFModA"), "ModA");
/// assert_eq!(decode_text(b"caf\xe9"), "café");
/// ```
#[must_use]
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match detect_encoding(bytes) {
        Encoding::Utf8 => {
            let (text, _had_errors) = UTF_8.decode_with_bom_removal(bytes);
            text
        }
        Encoding::Utf16Le => {
            let (text, _had_errors) = encoding_rs::UTF_16LE.decode_with_bom_removal(bytes);
            text
        }
        Encoding::Utf16Be => {
            let (text, _had_errors) = encoding_rs::UTF_16BE.decode_with_bom_removal(bytes);
            text
        }
        Encoding::Acp => {
            let (text, _had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
            text
        }
    }
}
