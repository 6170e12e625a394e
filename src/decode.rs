//! Encoding-tolerant text loading.
//!
//! Output files under comparison come from arbitrary tools and carry no
//! declared encoding. Decoding tries a fixed priority order: strict 7-bit
//! ASCII, then UTF-8 (stripping a leading BOM), then Latin-1. The order is
//! part of the contract: a pure-ASCII file must always be labeled ASCII even
//! though UTF-8 would decode it identically, and Latin-1 accepts any byte
//! string, making the chain total.
use crate::error::DiffoutError;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Ascii,
    Utf8,
    Latin1,
}

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Ascii => "ascii",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
        }
    }
}

/// One file decoded into normalized lines.
///
/// Lines are split on `\n` after `\r\n` and bare `\r` are normalized away.
/// A file ending in a newline keeps its empty trailing element so the diff
/// renderer sees the same shape on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFile {
    pub encoding: TextEncoding,
    pub lines: Vec<String>,
}

type Decoder = fn(&[u8]) -> Option<(TextEncoding, String)>;

// Priority order matters; see module docs.
const DECODERS: &[Decoder] = &[decode_ascii, decode_utf8, decode_latin1];

/// Decode `path` with the first strategy that accepts its bytes.
pub fn load(path: &Path) -> Result<DecodedFile> {
    if !path.is_file() {
        return Err(DiffoutError::FileNotFound(path.to_path_buf()).into());
    }
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    for decode in DECODERS {
        if let Some((encoding, text)) = decode(&bytes) {
            tracing::debug!("decoded {} as {}", path.display(), encoding.label());
            return Ok(DecodedFile {
                encoding,
                lines: split_lines(&text),
            });
        }
    }
    Err(DiffoutError::Undecodable(path.to_path_buf()).into())
}

fn split_lines(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    normalized.split('\n').map(str::to_string).collect()
}

fn decode_ascii(bytes: &[u8]) -> Option<(TextEncoding, String)> {
    if !bytes.is_ascii() {
        return None;
    }
    // ASCII is valid UTF-8, so this conversion cannot fail.
    std::str::from_utf8(bytes)
        .ok()
        .map(|text| (TextEncoding::Ascii, text.to_string()))
}

fn decode_utf8(bytes: &[u8]) -> Option<(TextEncoding, String)> {
    let text = std::str::from_utf8(bytes).ok()?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    Some((TextEncoding::Utf8, text.to_string()))
}

fn decode_latin1(bytes: &[u8]) -> Option<(TextEncoding, String)> {
    // Each byte maps to the codepoint of the same value; total by design
    // of the encoding, so the strategy chain always terminates here.
    let text: String = bytes.iter().map(|&b| b as char).collect();
    Some((TextEncoding::Latin1, text))
}
