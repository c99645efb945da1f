/*!
 * Cell state resolution.
 *
 * For every paired cell beyond the index column the rules apply in this order:
 * 1. an existing "unavailable" placeholder on either side forces both sides to it
 * 2. no link on either side leaves the cell alone (when the profile says so)
 * 3. an anchor-only placeholder link on either side leaves the cell alone
 * 4. a link on only one side leaves the cell alone
 * 5. otherwise both links are validated; any failure makes both sides "unavailable"
 *
 * Rows with no live link left may then be demoted to "not applicable".
 * Resolution is pure: validation outcomes come in as a map, so the network
 * work can run concurrently before any decision is made.
 */

use log::debug;
use std::collections::{BTreeMap, HashMap};
use url::Url;

use crate::table::links::{extract_href, file_name_of, rewrite_link, LinkCandidate};
use crate::table::{Cell, Row};
use crate::validation::ValidationOutcome;

use super::placeholders::{PlaceholderKind, Placeholders};
use super::plan::{Language, ReconcilePlan};
use super::profile::ReconcileProfile;

/// Cells of row `index` in both documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPair {
    pub index: usize,
    pub primary: Vec<Cell>,
    pub secondary: Vec<Cell>,
}

impl RowPair {
    /// Number of positionally paired cells, index column included
    pub fn column_count(&self) -> usize {
        self.primary.len().min(self.secondary.len())
    }

    /// Cell `column` of one language
    pub fn cell(&self, language: Language, column: usize) -> &Cell {
        match language {
            Language::Primary => &self.primary[column],
            Language::Secondary => &self.secondary[column],
        }
    }
}

/// Rows of both documents paired by position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePair {
    /// Paired rows that have cells on both sides
    pub rows: Vec<RowPair>,
    /// Rows found in the primary table body
    pub primary_row_count: usize,
    /// Rows found in the secondary table body
    pub secondary_row_count: usize,
}

impl TablePair {
    /// Pair `primary` and `secondary` rows up to the shorter count, skipping rows without cells
    pub fn new(primary: &[Row], secondary: &[Row]) -> Self {
        let rows = primary
            .iter()
            .zip(secondary.iter())
            .filter_map(|(a, b)| {
                let (primary, secondary) = (a.cells(), b.cells());
                if primary.is_empty() || secondary.is_empty() {
                    return None;
                }
                Some(RowPair { index: a.index, primary, secondary })
            })
            .collect();

        Self {
            rows,
            primary_row_count: primary.len(),
            secondary_row_count: secondary.len(),
        }
    }

    /// Whether the two tables have different row counts
    pub fn has_row_count_mismatch(&self) -> bool {
        self.primary_row_count != self.secondary_row_count
    }
}

/// What the pre-validation rules decided for one cell pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellAssessment {
    /// Rule 1: a side already reads "unavailable"
    ExistingUnavailable,
    /// Rule 2: neither side has a link
    NoLink,
    /// Rule 3: a side links to an anchor-only placeholder
    PlaceholderLink,
    /// Rule 4: only one side has a link
    AsymmetricLink,
    /// Rule 5: validate both sides (a missing link counts as invalid)
    Validate {
        primary: Option<LinkCandidate>,
        secondary: Option<LinkCandidate>,
    },
}

/// Final state of one column of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnState {
    Unavailable,
    Valid,
    Untouched { has_link: bool },
}

impl ColumnState {
    fn keeps_row(self) -> bool {
        matches!(self, Self::Valid | Self::Untouched { has_link: true })
    }
}

/// Applies the resolution rules to paired tables
#[derive(Debug, Clone)]
pub struct CellResolver<'a> {
    profile: ReconcileProfile,
    placeholders: &'a Placeholders,
    base_url: Option<Url>,
}

impl<'a> CellResolver<'a> {
    pub fn new(profile: ReconcileProfile, placeholders: &'a Placeholders) -> Self {
        Self { profile, placeholders, base_url: None }
    }

    /// Resolve relative hrefs against `base_url`
    pub fn with_base_url(mut self, base_url: Option<Url>) -> Self {
        self.base_url = base_url;
        self
    }

    /// The URL a raw href is probed as
    pub fn absolute_url(&self, raw: &str) -> String {
        let raw = raw.trim();
        if let Ok(url) = Url::parse(raw) {
            return url.to_string();
        }
        if let Some(url) = self.base_url.as_ref().and_then(|base| base.join(raw).ok()) {
            return url.to_string();
        }
        raw.to_string()
    }

    /// Apply the pre-validation rules to one cell pair
    pub fn assess(&self, primary: &Cell, secondary: &Cell) -> CellAssessment {
        if self.placeholders.is_unavailable(&primary.inner)
            || self.placeholders.is_unavailable(&secondary.inner)
        {
            return CellAssessment::ExistingUnavailable;
        }

        let primary_link = extract_href(&primary.inner);
        let secondary_link = extract_href(&secondary.inner);

        if primary_link.is_none() && secondary_link.is_none() && self.profile.skip_cells_without_links {
            return CellAssessment::NoLink;
        }
        let is_placeholder = |link: &Option<LinkCandidate>| link.as_ref().is_some_and(|l| l.placeholder);
        if is_placeholder(&primary_link) || is_placeholder(&secondary_link) {
            return CellAssessment::PlaceholderLink;
        }
        if primary_link.is_some() != secondary_link.is_some() {
            return CellAssessment::AsymmetricLink;
        }

        CellAssessment::Validate {
            primary: primary_link,
            secondary: secondary_link,
        }
    }

    /// Every URL that must be validated before `resolve` can decide
    pub fn urls_to_validate(&self, table: &TablePair) -> Vec<String> {
        let mut urls = Vec::new();
        for row in &table.rows {
            for column in 1..row.column_count() {
                if let CellAssessment::Validate { primary, secondary } =
                    self.assess(&row.primary[column], &row.secondary[column])
                {
                    urls.extend(primary.iter().chain(secondary.iter()).map(|l| self.absolute_url(&l.raw)));
                }
            }
        }
        urls
    }

    /// Build the replacement plans for both documents.
    ///
    /// A link whose URL is missing from `outcomes` was never probed; its cell is left alone.
    pub fn resolve(&self, table: &TablePair, outcomes: &HashMap<String, ValidationOutcome>) -> ReconcilePlan {
        let mut plan = ReconcilePlan::default();

        for row in &table.rows {
            let columns = row.column_count();
            if columns < 2 {
                continue;
            }

            let mut states = Vec::with_capacity(columns - 1);
            let mut new_primary: BTreeMap<usize, String> = BTreeMap::new();
            let mut new_secondary: BTreeMap<usize, String> = BTreeMap::new();

            for column in 1..columns {
                let (primary, secondary) = (&row.primary[column], &row.secondary[column]);

                let state = match self.assess(primary, secondary) {
                    CellAssessment::ExistingUnavailable => ColumnState::Unavailable,
                    CellAssessment::NoLink | CellAssessment::PlaceholderLink => {
                        ColumnState::Untouched { has_link: false }
                    }
                    CellAssessment::AsymmetricLink => ColumnState::Untouched { has_link: true },
                    CellAssessment::Validate { primary: primary_link, secondary: secondary_link } => {
                        let primary_outcome = self.lookup(primary_link.as_ref(), outcomes);
                        let secondary_outcome = self.lookup(secondary_link.as_ref(), outcomes);
                        let failed = |o: &Option<ValidationOutcome>| o.as_ref().is_some_and(|o| !o.is_valid);

                        if failed(&primary_outcome) || failed(&secondary_outcome) {
                            ColumnState::Unavailable
                        } else if primary_outcome.is_none() || secondary_outcome.is_none() {
                            plan.undecided_cells += 1;
                            ColumnState::Untouched { has_link: true }
                        } else {
                            for (cell, link, outcome, changes) in [
                                (primary, primary_link.as_ref(), primary_outcome.as_ref(), &mut new_primary),
                                (secondary, secondary_link.as_ref(), secondary_outcome.as_ref(), &mut new_secondary),
                            ] {
                                if let Some(rewritten) = self.rewrite_for_alternate(cell, link, outcome) {
                                    plan.rewritten_links += 1;
                                    changes.insert(column, rewritten);
                                }
                            }
                            ColumnState::Valid
                        }
                    }
                };

                if state == ColumnState::Unavailable {
                    new_primary.insert(column, self.markup(Language::Primary, PlaceholderKind::Unavailable));
                    new_secondary.insert(column, self.markup(Language::Secondary, PlaceholderKind::Unavailable));
                }
                states.push(state);
            }

            let demote = self.profile.demote_empty_rows && !states.iter().any(|s| s.keeps_row());
            if demote {
                for column in 1..columns {
                    new_primary.insert(column, self.markup(Language::Primary, PlaceholderKind::NotApplicable));
                    new_secondary.insert(column, self.markup(Language::Secondary, PlaceholderKind::NotApplicable));
                }
            }

            let mut row_changed = false;
            for (language, changes) in [(Language::Primary, new_primary), (Language::Secondary, new_secondary)] {
                for (column, inner) in changes {
                    if row.cell(language, column).inner != inner {
                        plan.for_language_mut(language).insert(row.index, column, inner);
                        row_changed = true;
                    }
                }
            }

            // Rows already reading "not applicable" are not demoted again
            if demote && row_changed {
                debug!("Row {} has no live link left, marking it not applicable", row.index);
                plan.demoted_rows.push(row.index);
            }
        }

        plan
    }

    fn markup(&self, language: Language, kind: PlaceholderKind) -> String {
        self.placeholders.markup(language, kind).to_string()
    }

    fn lookup(
        &self,
        link: Option<&LinkCandidate>,
        outcomes: &HashMap<String, ValidationOutcome>,
    ) -> Option<ValidationOutcome> {
        match link {
            None => Some(ValidationOutcome::invalid("")),
            Some(link) => outcomes.get(&self.absolute_url(&link.raw)).cloned(),
        }
    }

    fn rewrite_for_alternate(
        &self,
        cell: &Cell,
        link: Option<&LinkCandidate>,
        outcome: Option<&ValidationOutcome>,
    ) -> Option<String> {
        let (link, outcome) = (link?, outcome?);
        if outcome.resolved_url == self.absolute_url(&link.raw) {
            return None;
        }
        let new_file_name = file_name_of(&outcome.resolved_url)?;
        let rewritten = rewrite_link(&cell.inner, link, new_file_name);
        (rewritten != cell.inner).then_some(rewritten)
    }
}
