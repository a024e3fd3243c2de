// crates/sysparams-core/src/core/charset.rs
// ============================================================================
// Module: Character Sets
// Description: Charset handles used for request decoding and result encoding.
// Purpose: Give the parameter store concrete, copyable encoding handles.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`Charset`] converts between Rust strings and client byte streams. The
//! server's internal string representation is UTF-8, so UTF-8 is the default
//! for both directions. Conversions never fail: unmappable characters are
//! encoded as `?` and malformed input decodes to U+FFFD.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Charset
// ============================================================================

/// Byte substituted for characters the target charset cannot represent.
const UNMAPPABLE_BYTE: u8 = b'?';

/// Character sets understood by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Charset {
    /// UTF-8.
    #[default]
    #[serde(rename = "UTF-8")]
    Utf8,
    /// UTF-16, big endian, no byte order mark.
    #[serde(rename = "UTF-16")]
    Utf16,
    /// ISO-8859-1 (MySQL `latin1`).
    #[serde(rename = "ISO-8859-1")]
    Latin1,
    /// 7-bit US-ASCII.
    #[serde(rename = "US-ASCII")]
    Ascii,
}

impl Charset {
    /// Returns the canonical charset name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf16 => "UTF-16",
            Self::Latin1 => "ISO-8859-1",
            Self::Ascii => "US-ASCII",
        }
    }

    /// Encodes text into this charset.
    #[must_use]
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Utf16 => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            Self::Latin1 => {
                text.chars().map(|ch| u8::try_from(ch).unwrap_or(UNMAPPABLE_BYTE)).collect()
            }
            Self::Ascii => text
                .chars()
                .map(|ch| u8::try_from(ch).ok().filter(u8::is_ascii).unwrap_or(UNMAPPABLE_BYTE))
                .collect(),
        }
    }

    /// Decodes bytes from this charset.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Utf16 => {
                let units = bytes.chunks_exact(2).map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
                let mut text: String = char::decode_utf16(units)
                    .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
                    .collect();
                if bytes.len() % 2 != 0 {
                    text.push(char::REPLACEMENT_CHARACTER);
                }
                text
            }
            Self::Latin1 => bytes.iter().copied().map(char::from).collect(),
            Self::Ascii => bytes
                .iter()
                .map(|byte| {
                    if byte.is_ascii() { char::from(*byte) } else { char::REPLACEMENT_CHARACTER }
                })
                .collect(),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// SECTION: Decoder
// ============================================================================

/// Decoder for messages sent by a client (`character_set_client`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Decoder {
    /// Source charset of incoming bytes.
    charset: Charset,
}

impl Decoder {
    /// Creates a decoder for the provided charset.
    #[must_use]
    pub const fn new(charset: Charset) -> Self {
        Self {
            charset,
        }
    }

    /// Returns the charset this decoder reads.
    #[must_use]
    pub const fn charset(self) -> Charset {
        self.charset
    }

    /// Decodes client bytes into a string.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> String {
        self.charset.decode(bytes)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
