//! Text encoding detection and round-tripping for patched source files.
//!
//! A rewrite must leave every byte of the target file untouched except the
//! patched declaration, including the encoding preamble (byte-order mark).
//! This module detects the encoding from the file's leading bytes, decodes
//! the remainder to text, and re-encodes patched text with the original
//! preamble re-emitted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RewriteError;

/// A text encoding recognised by preamble detection.
///
/// The variants are ordered by detection priority: marked encodings are
/// tried first, and [`Encoding::Utf8`] has an empty preamble so it matches
/// unconditionally as the final fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    /// UTF-8 with a byte-order mark.
    Utf8Bom,
    /// Big-endian UTF-16 with a byte-order mark.
    Utf16Be,
    /// Little-endian UTF-32 with a byte-order mark.
    Utf32Le,
    /// Big-endian UTF-32 with a byte-order mark.
    Utf32Be,
    /// UTF-8 without a byte-order mark; unconditional fallback.
    Utf8,
}

/// Detection candidates in priority order.
///
/// Order matters: every marked preamble must be tried before the unmarked
/// UTF-8 fallback, which always matches trivially.
pub const CANDIDATES: [Encoding; 5] = [
    Encoding::Utf8Bom,
    Encoding::Utf16Be,
    Encoding::Utf32Le,
    Encoding::Utf32Be,
    Encoding::Utf8,
];

impl Encoding {
    /// Selects the first candidate whose preamble prefixes `bytes`.
    ///
    /// Total: the UTF-8 fallback has an empty preamble and always matches.
    #[must_use]
    pub fn detect(bytes: &[u8]) -> Self {
        CANDIDATES
            .into_iter()
            .find(|candidate| bytes.starts_with(candidate.preamble()))
            .unwrap_or(Self::Utf8)
    }

    /// Returns the preamble bytes that identify this encoding on disk.
    #[must_use]
    pub const fn preamble(self) -> &'static [u8] {
        match self {
            Self::Utf8Bom => &[0xEF, 0xBB, 0xBF],
            Self::Utf16Be => &[0xFE, 0xFF],
            Self::Utf32Le => &[0xFF, 0xFE, 0x00, 0x00],
            Self::Utf32Be => &[0x00, 0x00, 0xFE, 0xFF],
            Self::Utf8 => &[],
        }
    }

    /// Decodes `body` (the file content after the preamble) to text.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Decode`] if `body` is malformed for this
    /// encoding.
    pub fn decode(self, body: &[u8]) -> Result<String, RewriteError> {
        match self {
            Self::Utf8Bom | Self::Utf8 => std::str::from_utf8(body)
                .map(str::to_owned)
                .map_err(|error| RewriteError::decode(self, error.to_string())),
            Self::Utf16Be => decode_utf16_be(body),
            Self::Utf32Le => decode_utf32(body, Self::Utf32Le),
            Self::Utf32Be => decode_utf32(body, Self::Utf32Be),
        }
    }

    /// Encodes `text`, emitting this encoding's preamble followed by the
    /// encoded body.
    #[must_use]
    pub fn encode(self, text: &str) -> Vec<u8> {
        let mut out = self.preamble().to_vec();
        match self {
            Self::Utf8Bom | Self::Utf8 => out.extend_from_slice(text.as_bytes()),
            Self::Utf16Be => {
                for unit in text.encode_utf16() {
                    out.push(high_byte_u16(unit));
                    out.push(low_byte(u32::from(unit)));
                }
            }
            Self::Utf32Le => {
                for ch in text.chars() {
                    let value = u32::from(ch);
                    out.push(low_byte(value));
                    out.push(low_byte(value >> 8));
                    out.push(low_byte(value >> 16));
                    out.push(low_byte(value >> 24));
                }
            }
            Self::Utf32Be => {
                for ch in text.chars() {
                    let value = u32::from(ch);
                    out.push(low_byte(value >> 24));
                    out.push(low_byte(value >> 16));
                    out.push(low_byte(value >> 8));
                    out.push(low_byte(value));
                }
            }
        }
        out
    }

    /// Returns a short lowercase name for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8Bom => "utf-8 (bom)",
            Self::Utf16Be => "utf-16be",
            Self::Utf32Le => "utf-32le",
            Self::Utf32Be => "utf-32be",
            Self::Utf8 => "utf-8",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extracts the least significant byte of a shifted code-unit value.
#[expect(
    clippy::cast_possible_truncation,
    reason = "truncation to the low byte is the purpose of this helper"
)]
const fn low_byte(value: u32) -> u8 {
    (value & 0xFF) as u8
}

/// Extracts the high byte of a UTF-16 code unit.
#[expect(
    clippy::cast_possible_truncation,
    reason = "a u16 shifted right by eight bits fits in a byte"
)]
const fn high_byte_u16(unit: u16) -> u8 {
    (unit >> 8) as u8
}

fn decode_utf16_be(body: &[u8]) -> Result<String, RewriteError> {
    if body.len() & 1 != 0 {
        return Err(RewriteError::decode(
            Encoding::Utf16Be,
            format!("odd byte count {} for a 16-bit encoding", body.len()),
        ));
    }

    let mut units = Vec::with_capacity(body.len() >> 1);
    let mut bytes = body.iter().copied();
    while let (Some(high), Some(low)) = (bytes.next(), bytes.next()) {
        units.push((u16::from(high) << 8) | u16::from(low));
    }

    String::from_utf16(&units)
        .map_err(|error| RewriteError::decode(Encoding::Utf16Be, error.to_string()))
}

fn decode_utf32(body: &[u8], encoding: Encoding) -> Result<String, RewriteError> {
    if body.len() & 3 != 0 {
        return Err(RewriteError::decode(
            encoding,
            format!("byte count {} is not a multiple of four", body.len()),
        ));
    }

    let mut text = String::with_capacity(body.len() >> 2);
    let mut bytes = body.iter().copied();
    while let (Some(b0), Some(b1), Some(b2), Some(b3)) =
        (bytes.next(), bytes.next(), bytes.next(), bytes.next())
    {
        let value = if encoding == Encoding::Utf32Le {
            u32::from(b0) | (u32::from(b1) << 8) | (u32::from(b2) << 16) | (u32::from(b3) << 24)
        } else {
            (u32::from(b0) << 24) | (u32::from(b1) << 16) | (u32::from(b2) << 8) | u32::from(b3)
        };
        let ch = char::from_u32(value).ok_or_else(|| {
            RewriteError::decode(encoding, format!("invalid scalar value {value:#x}"))
        })?;
        text.push(ch);
    }

    Ok(text)
}
