/*!
 * Text encoding detection and byte-exact re-encoding.
 *
 * Detection order: UTF-8 byte-order mark, UTF-16 LE mark, UTF-16 BE mark,
 * strict UTF-8, then Windows-1252 as the legacy single-byte fallback.
 */

use encoding_rs::{UTF_16BE, UTF_16LE, WINDOWS_1252};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Encoding a document was read with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    /// UTF-8, with or without a leading byte-order mark
    Utf8 { bom: bool },
    /// UTF-16 little-endian (always detected through its mark)
    Utf16Le,
    /// UTF-16 big-endian (always detected through its mark)
    Utf16Be,
    /// Legacy single-byte fallback
    Windows1252,
}

impl TextEncoding {
    /// Detect the encoding of `bytes`, returning it with the length of the byte-order mark
    pub fn detect(bytes: &[u8]) -> (Self, usize) {
        if bytes.starts_with(UTF8_BOM) {
            if std::str::from_utf8(&bytes[UTF8_BOM.len()..]).is_ok() {
                (Self::Utf8 { bom: true }, UTF8_BOM.len())
            } else {
                // Mark kept as text so every byte round-trips
                (Self::Windows1252, 0)
            }
        } else if bytes.starts_with(UTF16LE_BOM) {
            (Self::Utf16Le, UTF16LE_BOM.len())
        } else if bytes.starts_with(UTF16BE_BOM) {
            (Self::Utf16Be, UTF16BE_BOM.len())
        } else if std::str::from_utf8(bytes).is_ok() {
            (Self::Utf8 { bom: false }, 0)
        } else {
            (Self::Windows1252, 0)
        }
    }

    /// Detect the encoding of `bytes` and decode them (mark excluded)
    pub fn decode(bytes: &[u8]) -> (Self, String) {
        let (encoding, bom_len) = Self::detect(bytes);
        let body = &bytes[bom_len..];

        let text = match encoding {
            Self::Utf8 { .. } => match std::str::from_utf8(body) {
                Ok(text) => text.to_string(),
                Err(_) => return (Self::Windows1252, WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned()),
            },
            Self::Utf16Le => {
                let (text, had_errors) = UTF_16LE.decode_without_bom_handling(body);
                if had_errors {
                    debug!("UTF-16LE document contained malformed sequences");
                }
                text.into_owned()
            }
            Self::Utf16Be => {
                let (text, had_errors) = UTF_16BE.decode_without_bom_handling(body);
                if had_errors {
                    debug!("UTF-16BE document contained malformed sequences");
                }
                text.into_owned()
            }
            Self::Windows1252 => WINDOWS_1252.decode_without_bom_handling(body).0.into_owned(),
        };

        (encoding, text)
    }

    /// Encode `text` back to bytes, re-adding the byte-order mark when the source had one
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 { bom } => {
                let mut out = Vec::with_capacity(text.len() + 3);
                if *bom {
                    out.extend_from_slice(UTF8_BOM);
                }
                out.extend_from_slice(text.as_bytes());
                out
            }
            Self::Utf16Le => {
                let mut out = Vec::with_capacity(text.len() * 2 + 2);
                out.extend_from_slice(UTF16LE_BOM);
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
                out
            }
            Self::Utf16Be => {
                let mut out = Vec::with_capacity(text.len() * 2 + 2);
                out.extend_from_slice(UTF16BE_BOM);
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
                out
            }
            Self::Windows1252 => {
                // Unmappable characters come out as HTML numeric character references
                let (bytes, _, had_unmappable) = WINDOWS_1252.encode(text);
                if had_unmappable {
                    debug!("Some characters were written as numeric references in a Windows-1252 document");
                }
                bytes.into_owned()
            }
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8 { bom: true } => write!(f, "utf-8 (bom)"),
            Self::Utf8 { bom: false } => write!(f, "utf-8"),
            Self::Utf16Le => write!(f, "utf-16le"),
            Self::Utf16Be => write!(f, "utf-16be"),
            Self::Windows1252 => write!(f, "windows-1252"),
        }
    }
}

/// Split `text` into its body and the exact trailing run of line breaks
pub fn split_trailing_newlines(text: &str) -> (&str, &str) {
    let body = text.trim_end_matches(['\r', '\n']);
    (body, &text[body.len()..])
}
