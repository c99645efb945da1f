/*!
 * Selective cell reconciliation between the two language documents.
 *
 * - `placeholders`: canonical "unavailable" / "not applicable" markup
 * - `profile`: per-variant policy flags
 * - `resolver`: the per-cell and per-row decision rules
 * - `plan`: the sparse replacement plans the decisions produce
 */

pub mod placeholders;
pub mod plan;
pub mod profile;
pub mod resolver;

pub use placeholders::{PlaceholderKind, Placeholders};
pub use plan::{Language, ReconcilePlan, ReplacementPlan};
pub use profile::ReconcileProfile;
pub use resolver::{CellAssessment, CellResolver, RowPair, TablePair};
