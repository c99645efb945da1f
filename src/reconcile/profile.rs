/*!
 * Variant-specific reconciliation policies.
 *
 * The forms tables and the publications tables follow slightly different
 * rules; each variant maps to a profile whose flags can be overridden
 * individually from the configuration.
 */

use crate::app_config::{ReconcileConfig, Variant};

/// Policy flags for the cell-state resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileProfile {
    /// Leave cells untouched when neither language has a link
    pub skip_cells_without_links: bool,

    /// Retry failed links against their alternate spellings
    pub resolve_alternates: bool,

    /// Turn rows without any live link into "not applicable" rows
    pub demote_empty_rows: bool,
}

impl ReconcileProfile {
    /// Get the profile for a given variant
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Forms => Self {
                skip_cells_without_links: false,
                resolve_alternates: false,
                demote_empty_rows: true,
            },
            Variant::Publications => Self {
                skip_cells_without_links: true,
                resolve_alternates: true,
                demote_empty_rows: false,
            },
        }
    }

    /// Profile for the configured variant with any explicit overrides applied
    pub fn from_config(config: &ReconcileConfig) -> Self {
        let base = Self::for_variant(config.variant);
        Self {
            skip_cells_without_links: config
                .skip_cells_without_links
                .unwrap_or(base.skip_cells_without_links),
            resolve_alternates: config.resolve_alternates.unwrap_or(base.resolve_alternates),
            demote_empty_rows: config.demote_empty_rows.unwrap_or(base.demote_empty_rows),
        }
    }
}
