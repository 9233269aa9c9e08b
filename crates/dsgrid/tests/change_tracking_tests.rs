//! Integration tests for edit tracking
//!
//! Covers the ledger/provider-diff reconciliation, discard at every scope and
//! partial-failure recovery of batch saves, through the `DatasetGrid` facade.

mod common;

use dsgrid::{DatasetGrid, GridEvent, RecordChanges};
use dsgrid_core::{
    ColumnMetadata, DataProvider, DataType, FieldChange, GridError, RawColumn, Record, RecordId,
    SummarizationType, Value,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

use common::{MockHost, MockProvider, MockRecord, invoice_provider, plain_config, record_events};

async fn mounted(provider: MockProvider) -> (Arc<MockProvider>, Arc<MockHost>, DatasetGrid) {
    let provider = Arc::new(provider);
    let host = MockHost::new();
    let grid = DatasetGrid::new(
        provider.clone() as Arc<dyn DataProvider>,
        host.clone(),
        plain_config(),
    );
    grid.refresh_columns().await.expect("should derive columns");
    (provider, host, grid)
}

fn id(id: &str) -> RecordId {
    RecordId::from(id)
}

// ============ get_changes Tests ============

#[tokio::test]
async fn single_edit_is_reported_and_cleared_per_cell() {
    let (_provider, _host, grid) = mounted(invoice_provider()).await;

    grid.set_value(&id("r1"), "amount", Value::Int(150))
        .expect("amount is editable");

    assert_eq!(
        grid.changes(),
        vec![RecordChanges {
            record_id: id("r1"),
            changes: vec![FieldChange::new("amount", Value::Int(100), Value::Int(150))],
        }]
    );

    grid.discard(Some(&id("r1")), Some("amount"));
    assert!(grid.changes().is_empty());
    assert!(!grid.tracker().has_pending());
}

#[tokio::test]
async fn programmatic_changes_are_not_user_changes() {
    let (provider, _host, grid) = mounted(invoice_provider()).await;

    grid.set_value(&id("r1"), "amount", Value::Int(150)).unwrap();
    provider.mock_record("r1").set_programmatic("name", "Contoso Ltd");
    provider.mock_record("r2").set_programmatic("status", Value::Int(3));

    let changes = grid.changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].changes.len(), 1);
    assert_eq!(changes[0].changes[0].column_name, "amount");
    assert_eq!(grid.tracker().change_count(), 1);
}

#[tokio::test]
async fn reverted_edit_is_omitted() {
    let (_provider, _host, grid) = mounted(invoice_provider()).await;

    grid.set_value(&id("r1"), "amount", Value::Int(150)).unwrap();
    grid.set_value(&id("r1"), "amount", Value::Int(100)).unwrap();

    assert!(grid.tracker().is_touched(&id("r1"), "amount"));
    assert!(grid.changes().is_empty());
}

#[tokio::test]
async fn discard_record_keeps_other_records() {
    let (provider, _host, grid) = mounted(invoice_provider()).await;

    grid.set_value(&id("r1"), "amount", Value::Int(150)).unwrap();
    grid.set_value(&id("r1"), "name", Value::from("Contoso Ltd")).unwrap();
    grid.set_value(&id("r2"), "amount", Value::Int(300)).unwrap();

    grid.discard(Some(&id("r1")), None);

    let changes = grid.changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].record_id, id("r2"));
    assert_eq!(provider.mock_record("r1").value("amount"), Value::Int(100));

    grid.discard(None, None);
    assert!(grid.changes().is_empty());
    assert_eq!(provider.mock_record("r2").value("amount"), Value::Int(250));
}

#[tokio::test]
async fn dataset_refresh_drops_the_ledger() {
    let (_provider, _host, grid) = mounted(invoice_provider()).await;
    let events = record_events(&grid);

    grid.set_value(&id("r1"), "amount", Value::Int(150)).unwrap();
    grid.on_dataset_refreshed();

    assert!(grid.changes().is_empty());
    assert!(!grid.tracker().has_pending());
    assert_eq!(events.lock().last(), Some(&GridEvent::Refreshed));
}

// ============ set_value Tests ============

#[tokio::test]
async fn edit_emits_cell_changed() {
    let (_provider, _host, grid) = mounted(invoice_provider()).await;
    let events = record_events(&grid);

    grid.set_value(&id("r2"), "name", Value::from("Northwind")).unwrap();

    assert_eq!(
        *events.lock(),
        vec![GridEvent::CellChanged {
            record_id: id("r2"),
            column: "name".to_string(),
        }]
    );
}

#[tokio::test]
async fn non_editable_column_refuses_edits() {
    let provider = invoice_provider()
        .with_column_metadata(RawColumn::new("createdon", DataType::DateAndTime), ColumnMetadata::default());
    let (_provider, _host, grid) = mounted(provider).await;

    let err = grid
        .set_value(&id("r1"), "createdon", Value::from("2024-01-05"))
        .unwrap_err();
    assert!(matches!(err, GridError::NotSupported(_)), "{err}");
    assert!(grid.changes().is_empty());
}

#[tokio::test]
async fn summary_rows_refuse_edits() {
    let provider = invoice_provider().with_record(
        MockRecord::new("group-1")
            .with_value("status", Value::Int(1))
            .with_summarization(SummarizationType::Grouping),
    );
    let (_provider, _host, grid) = mounted(provider).await;

    let err = grid
        .set_value(&id("group-1"), "amount", Value::Int(1))
        .unwrap_err();
    assert!(matches!(err, GridError::NotSupported(_)));
}

#[tokio::test]
async fn unknown_record_is_not_found() {
    let (_provider, _host, grid) = mounted(invoice_provider()).await;

    let err = grid.set_value(&id("missing"), "amount", Value::Int(1)).unwrap_err();
    assert!(matches!(err, GridError::NotFound(_)));
}

// ============ validity Tests ============

#[tokio::test]
async fn invalid_edit_blocks_save_all() {
    let provider = MockProvider::new()
        .with_column(RawColumn::new("amount", DataType::Currency))
        .with_record(
            MockRecord::new("r1")
                .with_value("amount", Value::Int(100))
                .with_invalid_value("amount", Value::Int(-5), "Amount must be positive"),
        )
        .with_record(MockRecord::new("r2").with_value("amount", Value::Int(7)));
    let (provider, host, grid) = mounted(provider).await;

    grid.set_value(&id("r1"), "amount", Value::Int(-5)).unwrap();
    grid.set_value(&id("r2"), "amount", Value::Int(8)).unwrap();

    assert!(!grid.tracker().is_valid(Some(&id("r1"))));
    assert!(grid.tracker().is_valid(Some(&id("r2"))));
    assert!(!grid.tracker().is_valid(None));

    let err = grid.save_all().await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(provider.mock_record("r1").save_count(), 0);
    assert_eq!(provider.mock_record("r2").save_count(), 0);
    assert!(host.dialogs().is_empty());

    // The valid record can still be saved on its own
    grid.save(&id("r2")).await.expect("r2 is valid");
    assert_eq!(provider.mock_record("r2").save_count(), 1);
}

#[tokio::test]
async fn validation_ignores_untouched_columns() {
    let provider = MockProvider::new()
        .with_column(RawColumn::new("name", DataType::Text))
        .with_column(RawColumn::new("amount", DataType::Currency))
        .with_record(
            MockRecord::new("r1")
                .with_value("name", "Contoso")
                .with_value("amount", Value::Int(-1))
                .with_invalid_value("amount", Value::Int(-1), "Amount must be positive"),
        );
    let (_provider, _host, grid) = mounted(provider).await;

    grid.set_value(&id("r1"), "name", Value::from("Contoso Ltd")).unwrap();
    assert!(grid.tracker().is_valid(None));
}

// ============ save Tests ============

#[tokio::test]
async fn failed_save_keeps_pending_edit_for_retry() {
    let provider = invoice_provider();
    let (provider, host, grid) = mounted(provider).await;
    let record = provider.mock_record("r1");
    record.fail_saves(Some("record is locked"));

    grid.set_value(&id("r1"), "amount", Value::Int(150)).unwrap();
    let err = grid.save(&id("r1")).await.unwrap_err();

    assert!(matches!(err, GridError::Save { .. }));
    assert_eq!(host.dialogs().len(), 1);
    assert_eq!(host.dialogs()[0].0, "Save failed");
    assert!(host.dialogs()[0].1[0].contains("record is locked"));
    assert_eq!(grid.changes().len(), 1);

    record.fail_saves(None);
    grid.save(&id("r1")).await.expect("retry should succeed");
    assert!(grid.changes().is_empty());
    assert_eq!(record.loaded_value("amount"), Value::Int(150));
}

#[tokio::test]
async fn save_all_survives_partial_failure() {
    let provider =
        invoice_provider().with_record(MockRecord::new("r3").with_value("amount", Value::Int(10)));
    let (provider, host, grid) = mounted(provider).await;
    provider.mock_record("r2").fail_saves(Some("duplicate detected"));

    grid.set_value(&id("r1"), "amount", Value::Int(150)).unwrap();
    grid.set_value(&id("r2"), "amount", Value::Int(300)).unwrap();
    grid.set_value(&id("r3"), "amount", Value::Int(20)).unwrap();
    let events = record_events(&grid);

    let summary = grid.save_all().await.expect("valid batch");

    // The failure in the middle does not stop the records after it
    assert_eq!(summary.saved, vec![id("r1"), id("r3")]);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, id("r2"));
    assert!(!summary.is_complete());

    // Failed record keeps its edit, saved ones are clean
    let pending = grid.changes();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].record_id, id("r2"));
    assert_eq!(provider.mock_record("r1").loaded_value("amount"), Value::Int(150));
    assert_eq!(provider.mock_record("r2").loaded_value("amount"), Value::Int(250));
    assert_eq!(provider.mock_record("r3").loaded_value("amount"), Value::Int(20));

    let dialogs = host.dialogs();
    assert_eq!(dialogs.len(), 1);
    assert_eq!(dialogs[0].0, "2 succeeded, 1 failed");
    assert_eq!(dialogs[0].1.len(), 1);
    assert!(dialogs[0].1[0].starts_with("r2: "));

    let events = events.lock();
    assert_eq!(events.first(), Some(&GridEvent::LoadingChanged { loading: true }));
    assert!(events.contains(&GridEvent::RecordSaved { record_id: id("r1") }));
    assert!(events.contains(&GridEvent::RecordSaved { record_id: id("r3") }));
    assert!(!events.contains(&GridEvent::RecordSaved { record_id: id("r2") }));
    assert!(events.contains(&GridEvent::LoadingChanged { loading: false }));
    assert!(
        events
            .iter()
            .any(|e| matches!(e, GridEvent::SaveFailed { record_id, .. } if *record_id == id("r2")))
    );
}

#[tokio::test]
async fn save_all_without_failures_opens_no_dialog() {
    let (_provider, host, grid) = mounted(invoice_provider()).await;

    grid.set_value(&id("r1"), "amount", Value::Int(150)).unwrap();
    let summary = grid.save_all().await.unwrap();

    assert!(summary.is_complete());
    assert!(host.dialogs().is_empty());
    assert!(!grid.tracker().has_pending());
}

#[tokio::test]
async fn unmounted_grid_refuses_saves() {
    let (_provider, _host, grid) = mounted(invoice_provider()).await;
    grid.set_value(&id("r1"), "amount", Value::Int(150)).unwrap();

    grid.unmount();

    assert!(matches!(grid.save_all().await, Err(GridError::Unmounted)));
    assert!(matches!(
        grid.set_value(&id("r1"), "amount", Value::Int(1)),
        Err(GridError::Unmounted)
    ));
}
