use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

use crate::app_config::Config;
use crate::document::Document;
use crate::errors::TableError;
use crate::file_utils::FileManager;
use crate::reconcile::{CellResolver, Language, Placeholders, ReconcilePlan, ReconcileProfile, TablePair};
use crate::table::{locate, split_rows, Row, TableSpan};
use crate::validation::{CancelFlag, HttpProbe, LinkProbe, LinkValidator, ValidatorOptions};

// @module: Application controller for table reconciliation

/// What happened to one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemStatus {
    /// At least one document was rewritten
    Updated,
    /// Nothing needed to change
    Unchanged,
    /// Changes were computed but not written
    DryRun,
    /// The item was not processed
    Skipped { reason: String },
    /// Processing started but a document could not be read or written
    Failed { reason: String },
}

impl ItemStatus {
    /// Short label for the summary table
    pub fn label(&self) -> String {
        match self {
            Self::Updated => "updated".to_string(),
            Self::Unchanged => "unchanged".to_string(),
            Self::DryRun => "dry-run".to_string(),
            Self::Skipped { reason } => format!("skipped: {}", reason),
            Self::Failed { reason } => format!("failed: {}", reason),
        }
    }
}

/// Per-item record handed to the summary report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReport {
    pub item: String,
    pub primary_path: Option<PathBuf>,
    pub secondary_path: Option<PathBuf>,
    pub primary_changes: usize,
    pub secondary_changes: usize,
    pub rows_demoted: usize,
    pub links_rewritten: usize,
    #[serde(flatten)]
    pub status: ItemStatus,
}

impl ItemReport {
    fn new(item: &str) -> Self {
        Self {
            item: item.to_string(),
            primary_path: None,
            secondary_path: None,
            primary_changes: 0,
            secondary_changes: 0,
            rows_demoted: 0,
            links_rewritten: 0,
            status: ItemStatus::Unchanged,
        }
    }

    fn skipped(mut self, reason: impl Into<String>) -> Self {
        self.status = ItemStatus::Skipped { reason: reason.into() };
        self
    }

    /// Changed cells across both documents
    pub fn total_changes(&self) -> usize {
        self.primary_changes + self.secondary_changes
    }
}

/// Reconciled text of a document pair
#[derive(Debug, Clone)]
pub struct PairOutcome {
    pub primary_text: String,
    pub secondary_text: String,
    pub plan: ReconcilePlan,
    /// Row counts when the two tables differ
    pub row_count_mismatch: Option<(usize, usize)>,
}

/// A document with its located and tokenized table body
struct ParsedTable {
    span: TableSpan,
    rows: Vec<Row>,
}

impl ParsedTable {
    fn parse(document: &Document) -> Result<Self, TableError> {
        let span = locate(&document.text)?;
        let rows = split_rows(&span.inner);
        Ok(Self { span, rows })
    }
}

/// Main application controller for table reconciliation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Shared link validator
    validator: LinkValidator,
    // @field: Canonical placeholder markup
    placeholders: Placeholders,
    // @field: Effective policy flags
    profile: ReconcileProfile,
    // @field: Base for relative links
    base_url: Option<Url>,
    // @field: Draw a progress bar over items
    show_progress: bool,
}

impl Controller {
    // @method: Create a new controller probing links over HTTP
    pub fn with_config(config: Config) -> Result<Self> {
        let probe = HttpProbe::new(config.validation.timeout(), &config.validation.user_agent)
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;
        Self::with_probe(config, Arc::new(probe))
    }

    // @method: Create a new controller with any link probe
    pub fn with_probe(config: Config, probe: Arc<dyn LinkProbe>) -> Result<Self> {
        config.validate()?;

        let profile = ReconcileProfile::from_config(&config.reconcile);
        let base_url = config.validation.parsed_base_url()?;
        let options = ValidatorOptions {
            max_concurrent_probes: config.validation.max_concurrent_probes,
            max_probes_per_host: config.validation.max_probes_per_host,
            resolve_alternates: profile.resolve_alternates,
        };

        Ok(Self {
            validator: LinkValidator::with_cancel_flag(probe, options, CancelFlag::new()),
            placeholders: Placeholders::from_config(&config),
            profile,
            base_url,
            show_progress: true,
            config,
        })
    }

    /// Enable or disable the item progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Flag that stops new probes and new items once set
    pub fn cancel_flag(&self) -> CancelFlag {
        self.validator.cancel_flag().clone()
    }

    /// The controller's configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of network probes issued so far
    pub fn probes_issued(&self) -> usize {
        self.validator.probes_issued()
    }

    /// Reconcile every item whose documents live in `docs_dir`
    pub async fn run<P: AsRef<Path>>(&self, items: &[String], docs_dir: P) -> Result<Vec<ItemReport>> {
        let docs_dir = docs_dir.as_ref();
        if !FileManager::dir_exists(docs_dir) {
            return Err(anyhow!("Document directory does not exist: {:?}", docs_dir));
        }

        let start_time = std::time::Instant::now();
        let progress_bar = self.progress_bar(items.len());

        let mut reports = Vec::with_capacity(items.len());
        for item in items {
            if self.validator.cancel_flag().is_cancelled() {
                reports.push(ItemReport::new(item).skipped("cancelled"));
                continue;
            }

            progress_bar.set_message(item.clone());
            let report = self.process_item(item, docs_dir).await;
            progress_bar.inc(1);
            reports.push(report);
        }
        progress_bar.finish_and_clear();

        let changed = reports.iter().filter(|r| r.total_changes() > 0).count();
        info!(
            "Processed {} item(s), {} with changes, {} probe(s) in {:.1}s",
            reports.len(),
            changed,
            self.probes_issued(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(reports)
    }

    /// Reconcile the document pair of one item; problems are reported, never raised
    pub async fn process_item(&self, item: &str, docs_dir: &Path) -> ItemReport {
        let mut report = ItemReport::new(item);
        let languages = &self.config.languages;

        report.primary_path = FileManager::resolve_document(docs_dir, item, &languages.primary.code);
        report.secondary_path = FileManager::resolve_document(docs_dir, item, &languages.secondary.code);

        let (Some(primary_path), Some(secondary_path)) = (report.primary_path.clone(), report.secondary_path.clone())
        else {
            let missing = if report.primary_path.is_none() { &languages.primary.code } else { &languages.secondary.code };
            warn!("Skipping {}: no '{}' document found", item, missing);
            return report.skipped(format!("missing {} document", missing));
        };

        let (primary, secondary) = match (Document::load(&primary_path), Document::load(&secondary_path)) {
            (Ok(primary), Ok(secondary)) => (primary, secondary),
            (Err(e), _) | (_, Err(e)) => {
                error!("Skipping {}: {}", item, e);
                report.status = ItemStatus::Failed { reason: e.to_string() };
                return report;
            }
        };

        let outcome = match self.reconcile_documents(&primary, &secondary).await {
            Ok(outcome) => outcome,
            Err((language, e)) => {
                warn!("Skipping {}: {} in the {} document", item, e, language);
                return report.skipped(format!("no table body in {} document", language));
            }
        };

        if let Some((primary_rows, secondary_rows)) = outcome.row_count_mismatch {
            warn!(
                "{}: row counts differ ({} vs {}), processing the first {}",
                item,
                primary_rows,
                secondary_rows,
                primary_rows.min(secondary_rows)
            );
        }

        report.primary_changes = outcome.plan.primary.change_count();
        report.secondary_changes = outcome.plan.secondary.change_count();
        report.rows_demoted = outcome.plan.demoted_rows.len();
        report.links_rewritten = outcome.plan.rewritten_links;

        if outcome.plan.is_empty() {
            debug!("{}: no changes", item);
            return report;
        }
        if self.config.dry_run {
            info!("{}: {} change(s) (dry run)", item, report.total_changes());
            report.status = ItemStatus::DryRun;
            return report;
        }

        for (document, text) in [(&primary, &outcome.primary_text), (&secondary, &outcome.secondary_text)] {
            if document.is_unchanged_by(text) {
                continue;
            }
            if let Err(e) = document.save(text) {
                error!("{}: {}", item, e);
                report.status = ItemStatus::Failed { reason: e.to_string() };
                return report;
            }
        }

        info!("{}: {} change(s) written", item, report.total_changes());
        report.status = ItemStatus::Updated;
        report
    }

    /// Reconcile two loaded documents without touching the file system
    pub async fn reconcile_documents(
        &self,
        primary: &Document,
        secondary: &Document,
    ) -> Result<PairOutcome, (Language, TableError)> {
        let primary_table = ParsedTable::parse(primary).map_err(|e| (Language::Primary, e))?;
        let secondary_table = ParsedTable::parse(secondary).map_err(|e| (Language::Secondary, e))?;

        let pair = TablePair::new(&primary_table.rows, &secondary_table.rows);
        let row_count_mismatch = pair
            .has_row_count_mismatch()
            .then_some((pair.primary_row_count, pair.secondary_row_count));

        let resolver = CellResolver::new(self.profile, &self.placeholders).with_base_url(self.base_url.clone());
        // Link outcomes are not carried from one document pair to the next
        self.validator.clear_cache();
        let outcomes = self.validator.validate_all(resolver.urls_to_validate(&pair)).await;
        let plan = resolver.resolve(&pair, &outcomes);
        if plan.undecided_cells > 0 {
            warn!("{} cell(s) left unchanged because probing was cancelled", plan.undecided_cells);
        }

        Ok(PairOutcome {
            primary_text: plan.primary.apply(&primary.text, &primary_table.span, &primary_table.rows),
            secondary_text: plan.secondary.apply(&secondary.text, &secondary_table.span, &secondary_table.rows),
            plan,
            row_count_mismatch,
        })
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let progress_bar = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} items {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style);
        progress_bar
    }
}

/// Render item reports as an aligned plain-text table with a totals line
pub fn render_summary(reports: &[ItemReport]) -> String {
    let headers = ["Item", "Primary", "Secondary", "Demoted", "Status"];
    let rows: Vec<[String; 5]> = reports
        .iter()
        .map(|r| {
            [
                r.item.clone(),
                r.primary_changes.to_string(),
                r.secondary_changes.to_string(),
                r.rows_demoted.to_string(),
                r.status.label(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: [&str; 5]| -> String {
        let mut line = format!(
            "{:<w0$}  {:>w1$}  {:>w2$}  {:>w3$}  {}",
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            cells[4],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        );
        line.truncate(line.trim_end().len());
        line
    };

    let mut out = String::new();
    out.push_str(&format_line(headers));
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));
    out.push('\n');
    for row in &rows {
        out.push_str(&format_line([&row[0], &row[1], &row[2], &row[3], &row[4]]));
        out.push('\n');
    }

    let total: usize = reports.iter().map(ItemReport::total_changes).sum();
    let updated = reports
        .iter()
        .filter(|r| matches!(r.status, ItemStatus::Updated | ItemStatus::DryRun))
        .count();
    let skipped = reports
        .iter()
        .filter(|r| matches!(r.status, ItemStatus::Skipped { .. } | ItemStatus::Failed { .. }))
        .count();
    out.push_str(&format!(
        "{} item(s), {} changed cell(s), {} with changes, {} skipped\n",
        reports.len(),
        total,
        updated,
        skipped
    ));
    out
}
