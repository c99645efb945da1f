/*!
 * Tests for item reports and the summary table
 */

use std::path::PathBuf;

use tablecheck::app_controller::{render_summary, ItemReport, ItemStatus};

fn report(item: &str, primary: usize, secondary: usize, demoted: usize, status: ItemStatus) -> ItemReport {
    ItemReport {
        item: item.to_string(),
        primary_path: Some(PathBuf::from(format!("{}-table-en.html", item))),
        secondary_path: Some(PathBuf::from(format!("{}-table-fr.html", item))),
        primary_changes: primary,
        secondary_changes: secondary,
        rows_demoted: demoted,
        links_rewritten: 0,
        status,
    }
}

#[test]
fn test_render_summary_withMixedStatuses_shouldAlignColumnsAndTotal() {
    let reports = vec![
        report("1234-a", 2, 1, 0, ItemStatus::Updated),
        report("5000-g", 0, 0, 0, ItemStatus::Unchanged),
        report("0001-b", 0, 0, 0, ItemStatus::Skipped { reason: "missing fr document".to_string() }),
    ];

    let summary = render_summary(&reports);
    let lines: Vec<&str> = summary.lines().collect();

    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("Item    Primary  Secondary  Demoted  Status"));
    assert!(lines[1].chars().all(|c| c == '-'));
    assert_eq!(lines[2], "1234-a        2          1        0  updated");
    assert!(lines[4].ends_with("skipped: missing fr document"));
    assert_eq!(lines[5], "3 item(s), 3 changed cell(s), 1 with changes, 1 skipped");
}

#[test]
fn test_render_summary_withNoReports_shouldStillPrintTotals() {
    let summary = render_summary(&[]);
    assert!(summary.ends_with("0 item(s), 0 changed cell(s), 0 with changes, 0 skipped\n"));
}

#[test]
fn test_item_report_serialize_shouldFlattenStatus() {
    let json = serde_json::to_value(report("1234-a", 1, 1, 1, ItemStatus::Failed { reason: "disk full".to_string() }))
        .unwrap();
    assert_eq!(json["status"], "failed");
    assert_eq!(json["reason"], "disk full");
    assert_eq!(json["rows_demoted"], 1);

    let json = serde_json::to_value(report("x", 0, 0, 0, ItemStatus::DryRun)).unwrap();
    assert_eq!(json["status"], "dry_run");
}

#[test]
fn test_item_status_label_shouldBeShort() {
    assert_eq!(ItemStatus::DryRun.label(), "dry-run");
    assert_eq!(ItemStatus::Unchanged.label(), "unchanged");
}
