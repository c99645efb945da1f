use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::DocumentError;

use super::encoding::{split_trailing_newlines, TextEncoding};

/// A document loaded with enough information to be written back byte-for-byte
#[derive(Debug, Clone)]
pub struct Document {
    /// Where the document was read from
    pub path: PathBuf,

    /// Bytes exactly as read
    pub raw: Vec<u8>,

    /// Decoded text without the trailing line breaks
    pub text: String,

    /// Encoding detected on load
    pub encoding: TextEncoding,

    /// Trailing run of line-break characters, possibly empty
    pub trailing_newline: String,
}

impl Document {
    /// Load a document, detecting its encoding and trailing line breaks
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let raw = fs::read(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let document = Self::from_bytes(path, raw);
        debug!(
            "Loaded {:?} ({}, trailing {:?})",
            document.path, document.encoding, document.trailing_newline
        );
        Ok(document)
    }

    /// Build a document from bytes already in memory
    pub fn from_bytes<P: AsRef<Path>>(path: P, raw: Vec<u8>) -> Self {
        let (encoding, decoded) = TextEncoding::decode(&raw);
        let (body, trailing) = split_trailing_newlines(&decoded);
        let (text, trailing_newline) = (body.to_string(), trailing.to_string());

        Self {
            path: path.as_ref().to_path_buf(),
            raw,
            text,
            encoding,
            trailing_newline,
        }
    }

    /// Bytes that `text` would be written as, using this document's encoding and trailer
    pub fn render(&self, text: &str) -> Vec<u8> {
        render(text, self.encoding, &self.trailing_newline)
    }

    /// Write `text` over this document's path with the original encoding and trailer
    pub fn save(&self, text: &str) -> Result<(), DocumentError> {
        save(&self.path, text, self.encoding, &self.trailing_newline)
    }

    /// Whether `text` would produce exactly the bytes the document was loaded from
    pub fn is_unchanged_by(&self, text: &str) -> bool {
        self.render(text) == self.raw
    }
}

/// Encode `text` with its trailing line breaks replaced by `trailing`
pub fn render(text: &str, encoding: TextEncoding, trailing: &str) -> Vec<u8> {
    let (body, _) = split_trailing_newlines(text);
    let mut full = String::with_capacity(body.len() + trailing.len());
    full.push_str(body);
    full.push_str(trailing);
    encoding.encode(&full)
}

/// Write `text` to `path` using `encoding` and the captured trailing sequence
pub fn save<P: AsRef<Path>>(
    path: P,
    text: &str,
    encoding: TextEncoding,
    trailing: &str,
) -> Result<(), DocumentError> {
    let path = path.as_ref();
    fs::write(path, render(text, encoding, trailing)).map_err(|source| DocumentError::Write {
        path: path.to_path_buf(),
        source,
    })
}
