use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

use crate::errors::TableError;

// @const: First <tbody ...>...</tbody> pair, non-greedy
static TBODY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<tbody\b[^>]*>(.*?)</tbody\s*>").unwrap()
});

/// The located table-body region of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpan {
    /// Offset of `<tbody`
    pub start: usize,

    /// Offset just past `</tbody>`
    pub end: usize,

    /// Offset range of the content between the tags
    pub inner_range: Range<usize>,

    /// Content between the tags
    pub inner: String,
}

/// Locate the first table body in `text`
pub fn locate(text: &str) -> Result<TableSpan, TableError> {
    let caps = TBODY_REGEX.captures(text).ok_or(TableError::TableBodyNotFound)?;
    let whole = caps.get(0).ok_or(TableError::TableBodyNotFound)?;
    let inner = caps.get(1).ok_or(TableError::TableBodyNotFound)?;

    Ok(TableSpan {
        start: whole.start(),
        end: whole.end(),
        inner_range: inner.range(),
        inner: inner.as_str().to_string(),
    })
}
