//! Text decoding for deck files.
//!
//! Decks are usually written by Windows tools in a Western European
//! single-byte code page. Files that are valid UTF-8 are always read as
//! UTF-8; otherwise the configured single-byte table is applied.

use crate::error::{Result, ScheduleError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Supported deck text encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    #[default]
    Cp1252,
}

/// Windows-1252 code points for bytes 0x80..=0x9F; the rest match Latin-1
const CP1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

impl TextEncoding {
    /// Decode raw file bytes into text
    pub fn decode(&self, bytes: &[u8]) -> String {
        if let Ok(text) = std::str::from_utf8(bytes) {
            return text.to_string();
        }
        match self {
            TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            TextEncoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            TextEncoding::Cp1252 => bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => CP1252_HIGH[(b - 0x80) as usize],
                    _ => char::from(b),
                })
                .collect(),
        }
    }

    /// Read and decode a whole file
    pub fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path)?;
        debug!("Read {} bytes from {} as {}", bytes.len(), path.display(), self);
        Ok(self.decode(&bytes))
    }
}

impl FromStr for TextEncoding {
    type Err = ScheduleError;

    fn from_str(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "latin1" | "latin-1" | "iso-8859-1" | "iso8859-1" => Ok(TextEncoding::Latin1),
            "cp1252" | "windows-1252" => Ok(TextEncoding::Cp1252),
            other => Err(ScheduleError::configuration(format!(
                "Unsupported text encoding '{}' (expected utf-8, latin1 or cp1252)",
                other
            ))),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin1",
            TextEncoding::Cp1252 => "cp1252",
        };
        f.write_str(name)
    }
}
