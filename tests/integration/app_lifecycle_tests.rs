/*!
 * Integration tests for controller lifecycle and per-item handling
 */

use anyhow::Result;
use std::fs;
use std::sync::Arc;

use tablecheck::app_config::Config;
use tablecheck::app_controller::{Controller, ItemStatus};
use tablecheck::document::Document;
use crate::common::{self, doc_url, link_cell};
use crate::common::mock_probes::StaticProbe;

fn controller(config: Config) -> Result<(Controller, Arc<StaticProbe>)> {
    common::init_test_logging();
    let probe = Arc::new(StaticProbe::with_live([doc_url("a/a-e.pdf"), doc_url("a/a-f.pdf")]));
    let controller = Controller::with_probe(config, probe.clone())?.with_progress(false);
    Ok((controller, probe))
}

fn simple_pair() -> (String, String) {
    (
        common::table_document("en", &[vec!["A".to_string(), link_cell("a/a-e.pdf")]]),
        common::table_document("fr", &[vec!["A".to_string(), link_cell("a/a-f.pdf")]]),
    )
}

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldSucceed() -> Result<()> {
    let controller = Controller::with_config(Config::default())?.with_progress(false);
    assert_eq!(controller.probes_issued(), 0);
    assert!(!controller.cancel_flag().is_cancelled());

    // An empty item list is a valid run
    let temp_dir = common::create_temp_dir()?;
    let reports = tokio_test::block_on(controller.run(&[], temp_dir.path()))?;
    assert!(reports.is_empty());
    Ok(())
}

/// Test the controller rejects invalid configuration
#[test]
fn test_controller_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.validation.max_concurrent_probes = 0;
    assert!(Controller::with_config(config).is_err());

    let mut config = Config::default();
    config.languages.secondary.code = "en".to_string();
    assert!(controller(config).is_err());
}

#[tokio::test]
async fn test_run_withMissingDocsDir_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let (controller, _) = controller(Config::default())?;
    assert!(controller.run(&["a".to_string()], dir.path().join("missing")).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_run_withMissingSecondaryDocument_shouldSkipItemAndContinue() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let (primary, secondary) = simple_pair();
    common::create_test_file(dir.path(), "lonely-table-en.html", &primary)?;
    common::create_document_pair(dir.path(), "a", &primary, &secondary)?;

    let (controller, _) = controller(Config::default())?;
    let reports = controller
        .run(&["lonely".to_string(), "a".to_string()], dir.path())
        .await?;

    assert_eq!(reports.len(), 2);
    assert_eq!(
        reports[0].status,
        ItemStatus::Skipped { reason: "missing fr document".to_string() }
    );
    assert!(reports[0].primary_path.is_some());
    assert_eq!(reports[1].status, ItemStatus::Unchanged);
    Ok(())
}

#[tokio::test]
async fn test_run_withoutTableBody_shouldSkipItemWithoutWriting() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let (primary, _) = simple_pair();
    let broken = "<html><table><tr><td>A</td><td>x</td></tr></table></html>";
    let (primary_path, _) = common::create_document_pair(dir.path(), "a", &primary, broken)?;

    let (controller, probe) = controller(Config::default())?;
    let reports = controller.run(&["a".to_string()], dir.path()).await?;

    assert!(matches!(&reports[0].status, ItemStatus::Skipped { reason } if reason.contains("secondary")));
    assert!(probe.calls().is_empty());
    assert_eq!(fs::read_to_string(primary_path)?, primary);
    Ok(())
}

#[tokio::test]
async fn test_run_withHtmExtension_shouldFindDocuments() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let (primary, secondary) = simple_pair();
    common::create_test_file(dir.path(), "a-table-en.htm", &primary)?;
    common::create_test_file(dir.path(), "a-table-fr.htm", &secondary)?;

    let (controller, probe) = controller(Config::default())?;
    let reports = controller.run(&["a".to_string()], dir.path()).await?;

    assert_eq!(reports[0].status, ItemStatus::Unchanged);
    assert_eq!(probe.calls().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_run_afterCancellation_shouldSkipRemainingItems() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let (primary, secondary) = simple_pair();
    common::create_document_pair(dir.path(), "a", &primary, &secondary)?;

    let (controller, probe) = controller(Config::default())?;
    controller.cancel_flag().cancel();
    let reports = controller.run(&["a".to_string(), "b".to_string()], dir.path()).await?;

    assert!(reports
        .iter()
        .all(|r| r.status == ItemStatus::Skipped { reason: "cancelled".to_string() }));
    assert!(probe.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_run_withSameLinksInTwoItems_shouldValidateEachItemAfresh() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let (primary, secondary) = simple_pair();
    common::create_document_pair(dir.path(), "a", &primary, &secondary)?;
    common::create_document_pair(dir.path(), "b", &primary, &secondary)?;

    let (controller, probe) = controller(Config::default())?;
    let reports = controller.run(&["a".to_string(), "b".to_string()], dir.path()).await?;

    assert!(reports.iter().all(|r| r.status == ItemStatus::Unchanged));
    assert_eq!(probe.call_count(&doc_url("a/a-e.pdf")), 2);
    assert_eq!(probe.call_count(&doc_url("a/a-f.pdf")), 2);
    assert_eq!(controller.probes_issued(), 4);
    Ok(())
}

#[tokio::test]
async fn test_run_withRowCountMismatch_shouldReconcileSharedRows() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let primary = common::table_document(
        "en",
        &[
            vec!["A".to_string(), link_cell("a/a-e.pdf")],
            vec!["B".to_string(), link_cell("b/b-e.pdf")],
        ],
    );
    let secondary = common::table_document("fr", &[vec!["A".to_string(), link_cell("a/dead-f.pdf")]]);
    let (primary_path, _) = common::create_document_pair(dir.path(), "a", &primary, &secondary)?;

    let (controller, probe) = controller(Config::default())?;
    let reports = controller.run(&["a".to_string()], dir.path()).await?;

    assert_eq!(reports[0].primary_changes, 1);
    assert_eq!(probe.call_count(&doc_url("b/b-e.pdf")), 0);
    assert!(fs::read_to_string(primary_path)?.contains(&link_cell("b/b-e.pdf")));
    Ok(())
}

#[tokio::test]
async fn test_reconcile_documents_withInMemoryPair_shouldNotWrite() -> Result<()> {
    let (primary, secondary) = simple_pair();
    let primary_doc = Document::from_bytes("a-table-en.html", primary.clone().into_bytes());
    let secondary_doc = Document::from_bytes("a-table-fr.html", secondary.clone().into_bytes());

    let (controller, _) = controller(Config::default())?;
    let outcome = controller
        .reconcile_documents(&primary_doc, &secondary_doc)
        .await
        .map_err(|(language, e)| anyhow::anyhow!("{}: {}", language, e))?;

    assert!(outcome.plan.is_empty());
    assert_eq!(outcome.row_count_mismatch, None);
    assert_eq!(format!("{}\n", outcome.primary_text), primary);
    Ok(())
}
