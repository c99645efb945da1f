use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::table::{apply_document, apply_row, apply_table_body, Row, TableSpan};

/// Which document of the pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Primary,
    Secondary,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

/// Sparse map of row index -> cell index -> new inner markup for one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementPlan {
    rows: BTreeMap<usize, BTreeMap<usize, String>>,
}

impl ReplacementPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record new inner markup for a cell
    pub fn insert(&mut self, row: usize, cell: usize, inner: String) {
        self.rows.entry(row).or_default().insert(cell, inner);
    }

    /// Replacement for one cell, if any
    pub fn get(&self, row: usize, cell: usize) -> Option<&str> {
        self.rows.get(&row)?.get(&cell).map(String::as_str)
    }

    /// Replacements for one row
    pub fn row(&self, row: usize) -> Option<&BTreeMap<usize, String>> {
        self.rows.get(&row)
    }

    /// Iterate over rows that have replacements
    pub fn rows(&self) -> impl Iterator<Item = (&usize, &BTreeMap<usize, String>)> {
        self.rows.iter()
    }

    /// Number of cells that change
    pub fn change_count(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Splice this plan into `document_text`, whose table body is `span` split into `rows`
    pub fn apply(&self, document_text: &str, span: &TableSpan, rows: &[Row]) -> String {
        if self.is_empty() {
            return document_text.to_string();
        }

        let mut row_replacements = BTreeMap::new();
        for row in rows {
            if let Some(cells) = self.row(row.index) {
                let new_row = apply_row(&row.text, &row.cells(), cells);
                row_replacements.insert(row.index, new_row);
            }
        }

        let new_inner = apply_table_body(&span.inner, rows, &row_replacements);
        apply_document(document_text, span, &new_inner)
    }
}

/// Outcome of resolving one document pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Replacements for the primary document
    pub primary: ReplacementPlan,

    /// Replacements for the secondary document
    pub secondary: ReplacementPlan,

    /// Rows whose data cells were changed to "not applicable"
    pub demoted_rows: Vec<usize>,

    /// Cells whose link was pointed at an alternate URL
    pub rewritten_links: usize,

    /// Cells left alone because their links were never probed
    pub undecided_cells: usize,
}

impl ReconcilePlan {
    /// The plan for one language
    pub fn for_language(&self, language: Language) -> &ReplacementPlan {
        match language {
            Language::Primary => &self.primary,
            Language::Secondary => &self.secondary,
        }
    }

    pub(crate) fn for_language_mut(&mut self, language: Language) -> &mut ReplacementPlan {
        match language {
            Language::Primary => &mut self.primary,
            Language::Secondary => &mut self.secondary,
        }
    }

    /// Whether neither document changes
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty()
    }
}
