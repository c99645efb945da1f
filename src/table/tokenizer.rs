use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

// @const: <tr ...>...</tr>, non-greedy, rows do not nest
static ROW_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<tr\b[^>]*>.*?</tr\s*>").unwrap()
});

// @const: <td ...>...</td> or <th ...>...</th>, closing tag matching the opener
static CELL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)(?P<td_open><(?P<td_tag>td)\b(?P<td_attrs>[^>]*)>)(?P<td_inner>.*?)(?P<td_close></td\s*>)|(?P<th_open><(?P<th_tag>th)\b(?P<th_attrs>[^>]*)>)(?P<th_inner>.*?)(?P<th_close></th\s*>)",
    )
    .unwrap()
});

/// A table row, identified by its position in the table body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Ordinal position within the table body
    pub index: usize,

    /// Full row text, `<tr>` and `</tr>` included
    pub text: String,

    /// Offset of the row within the table-body text
    pub offset: usize,
}

impl Row {
    /// Byte range of the row within the table-body text
    pub fn span(&self) -> Range<usize> {
        self.offset..self.offset + self.text.len()
    }

    /// Cells of this row
    pub fn cells(&self) -> Vec<Cell> {
        split_cells(&self.text)
    }
}

/// A header or data cell inside a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Position within the row; 0 is the index column
    pub index: usize,

    /// Tag name as written in the source (`td`, `TH`, ...)
    pub tag: String,

    /// Attribute text of the opening tag, verbatim
    pub attributes: String,

    /// Inner markup
    pub inner: String,

    /// Opening tag, verbatim
    pub open_tag: String,

    /// Closing tag, verbatim
    pub close_tag: String,

    /// Offset of the cell within the row text
    pub offset: usize,
}

impl Cell {
    /// Byte range of the whole cell within the row text
    pub fn span(&self) -> Range<usize> {
        self.offset..self.offset + self.open_tag.len() + self.inner.len() + self.close_tag.len()
    }

    /// The cell rebuilt with `inner` in place of its content, tags kept verbatim
    pub fn with_inner(&self, inner: &str) -> String {
        let mut out = String::with_capacity(self.open_tag.len() + inner.len() + self.close_tag.len());
        out.push_str(&self.open_tag);
        out.push_str(inner);
        out.push_str(&self.close_tag);
        out
    }
}

/// Split table-body text into its rows
pub fn split_rows(table_body: &str) -> Vec<Row> {
    ROW_REGEX
        .find_iter(table_body)
        .enumerate()
        .map(|(index, m)| Row {
            index,
            text: m.as_str().to_string(),
            offset: m.start(),
        })
        .collect()
}

/// Split row text into its header and data cells
pub fn split_cells(row_text: &str) -> Vec<Cell> {
    CELL_REGEX
        .captures_iter(row_text)
        .enumerate()
        .filter_map(|(index, caps)| {
            let prefix = if caps.name("td_tag").is_some() { "td" } else { "th" };
            let group = |name: &str| caps.name(&format!("{}_{}", prefix, name));

            let open = group("open")?;
            Some(Cell {
                index,
                tag: group("tag")?.as_str().to_string(),
                attributes: group("attrs").map(|m| m.as_str().to_string()).unwrap_or_default(),
                inner: group("inner").map(|m| m.as_str().to_string()).unwrap_or_default(),
                open_tag: open.as_str().to_string(),
                close_tag: group("close")?.as_str().to_string(),
                offset: open.start(),
            })
        })
        .collect()
}
