//! Ingest path: primary append decides, mirror is best effort.

use crate::common::*;
use mnemo::{IngestOutcome, MirrorOutcome, StreamStoreConfig};
use std::sync::Arc;

#[test]
fn write_lands_in_both_stores_with_shared_timestamp() {
    let stack = TestStack::new();
    let receipt = stack
        .service
        .write("proj1", obj(json!({"k": "v"})), Some(obj(json!({"src": "unit"}))))
        .unwrap();

    let entries = stack.primary.range("project:proj1", "-", "+").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id.to_string(), receipt.id);
    assert_eq!(entries[0].fields["timestamp"], receipt.timestamp);

    let rows = stack
        .backup
        .select(&RowFilter::for_project("proj1"), PageWindow::new(10, 0))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].timestamp, receipt.timestamp);
    assert_eq!(rows[0].metadata.as_deref(), Some(r#"{"src": "unit"}"#));
}

#[test]
fn backup_down_does_not_fail_write() {
    let stack = TestStack::new();
    stack.backup_down();

    let outcome: IngestOutcome = stack
        .service
        .ingest("proj1", obj(json!({"k": "v"})), None)
        .unwrap();
    assert!(matches!(outcome.mirror, MirrorOutcome::Failed(_)));

    let page = stack.service.read("proj1", &ReadRequest::default()).unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, outcome.receipt.id);
}

#[test]
fn primary_down_fails_write_without_mirroring() {
    let stack = TestStack::new();
    stack.primary_down();

    let err = stack
        .service
        .write("proj1", obj(json!({"k": "v"})), None)
        .unwrap_err();
    assert!(matches!(err, Error::PrimaryStore(_)));
    assert_eq!(stack.backup_count("proj1"), 0);
}

#[test]
fn successful_mirror_reports_row_id() {
    let stack = TestStack::new();
    let first = stack.service.ingest("proj1", Payload::new(), None).unwrap();
    let second = stack.service.ingest("proj1", Payload::new(), None).unwrap();
    match (first.mirror, second.mirror) {
        (MirrorOutcome::Mirrored(a), MirrorOutcome::Mirrored(b)) => assert!(b > a),
        other => panic!("expected both mirrored, got {:?}", other),
    }
}

#[test]
fn primary_ids_increase_within_project() {
    let stack = TestStack::new();
    let ids: Vec<StreamId> = stack
        .write_values("proj1", &["a", "b", "c", "d"])
        .iter()
        .map(|id| id.parse().unwrap())
        .collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn full_primary_rejects_write() {
    let primary = Arc::new(StreamStore::with_config(StreamStoreConfig {
        max_entries: Some(1),
    }));
    let backup = Arc::new(SqliteBackupStore::open_in_memory().unwrap());
    let service = MemoryService::new(StoreContext::new(primary, backup));

    service.write("proj1", Payload::new(), None).unwrap();
    let err = service.write("proj1", Payload::new(), None).unwrap_err();
    assert!(matches!(
        err,
        Error::PrimaryStore(StoreError::CapacityExceeded(_))
    ));

    // purging frees room
    service.purge("proj1", true).unwrap();
    service.write("proj1", Payload::new(), None).unwrap();
}

#[test]
fn invalid_project_rejected_before_store_access() {
    let stack = TestStack::new();
    for bad in ["", "a-b", "with space", "slash/es"] {
        let err = stack.service.write(bad, Payload::new(), None).unwrap_err();
        assert!(matches!(err, Error::InvalidProject(_)), "{bad:?}");
    }
    assert_eq!(stack.primary.len("project:").unwrap(), 0);
}
