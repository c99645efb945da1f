/*!
 * Span-preserving reconstruction.
 *
 * Each function walks ordered child spans left to right, copying the gap
 * before each span verbatim, then either the original span or its
 * replacement, then the trailing remainder. Bytes outside replaced spans
 * are never re-generated.
 */

use std::collections::BTreeMap;
use std::ops::Range;

use super::locator::TableSpan;
use super::tokenizer::{Cell, Row};

/// Rebuild `source` with the given spans substituted.
///
/// Spans must be ordered, non-overlapping and inside `source`.
pub fn splice<'a, I>(source: &str, replacements: I) -> String
where
    I: IntoIterator<Item = (Range<usize>, &'a str)>,
{
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;

    for (span, replacement) in replacements {
        debug_assert!(span.start >= cursor && span.end <= source.len());
        out.push_str(&source[cursor..span.start]);
        out.push_str(replacement);
        cursor = span.end;
    }

    out.push_str(&source[cursor..]);
    out
}

/// Replace the inner markup of the cells named in `replacements`
pub fn apply_row(row_text: &str, cells: &[Cell], replacements: &BTreeMap<usize, String>) -> String {
    if replacements.is_empty() {
        return row_text.to_string();
    }

    let rebuilt: Vec<(Range<usize>, String)> = cells
        .iter()
        .filter_map(|cell| {
            replacements
                .get(&cell.index)
                .map(|inner| (cell.span(), cell.with_inner(inner)))
        })
        .collect();

    splice(row_text, rebuilt.iter().map(|(span, text)| (span.clone(), text.as_str())))
}

/// Replace the rows named in `replacements` with their new full text
pub fn apply_table_body(table_body: &str, rows: &[Row], replacements: &BTreeMap<usize, String>) -> String {
    if replacements.is_empty() {
        return table_body.to_string();
    }

    splice(
        table_body,
        rows.iter().filter_map(|row| {
            replacements
                .get(&row.index)
                .map(|text| (row.span(), text.as_str()))
        }),
    )
}

/// Replace the table-body content of the whole document
pub fn apply_document(document_text: &str, span: &TableSpan, new_inner: &str) -> String {
    splice(document_text, [(span.inner_range.clone(), new_inner)])
}
