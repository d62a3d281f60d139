//! Purge coordinator: independent deletes, partial reports.

use crate::common::*;
use mnemo::PurgeStatus;

#[test]
fn unconfirmed_purge_changes_nothing() {
    let stack = TestStack::new();
    stack.write_values("proj1", &["a", "b"]);

    let err = stack.service.purge("proj1", false).unwrap_err();
    assert!(matches!(err, Error::ConfirmationRequired));
    assert_eq!(stack.primary.len("project:proj1").unwrap(), 2);
    assert_eq!(stack.backup_count("proj1"), 2);
}

#[test]
fn confirmed_purge_reports_both_sides() {
    let stack = TestStack::new();
    stack.write_values("proj1", &["a", "b", "c"]);

    let report = stack.service.purge("proj1", true).unwrap();
    assert_eq!(report.status, PurgeStatus::Success);
    assert_eq!(report.project.as_str(), "proj1");
    assert!(report.primary_deleted);
    assert_eq!(report.secondary_deleted, 3);
    assert!(report.primary_error.is_none());
    assert!(report.secondary_error.is_none());
}

#[test]
fn backup_down_purge_is_partial() {
    let stack = TestStack::new();
    stack.write_values("proj1", &["a"]);
    stack.backup_down();

    let report = stack.service.purge("proj1", true).unwrap();
    assert_eq!(report.status, PurgeStatus::Partial);
    assert!(report.primary_deleted);
    assert_eq!(report.secondary_deleted, 0);
    assert!(report.secondary_error.is_some());

    // the mirror still holds the record and now serves it
    stack.backup.set_up(true);
    let page = stack.service.read("proj1", &ReadRequest::default()).unwrap();
    assert_eq!(values(&page.items), vec![json!("a")]);
}

#[test]
fn primary_down_purge_is_partial() {
    let stack = TestStack::new();
    stack.write_values("proj1", &["a", "b"]);
    stack.primary_down();

    let report = stack.service.purge("proj1", true).unwrap();
    assert_eq!(report.status, PurgeStatus::Partial);
    assert!(!report.primary_deleted);
    assert_eq!(report.secondary_deleted, 2);
    assert!(report.primary_error.is_some());

    stack.primary.set_up(true);
    assert_eq!(stack.primary.len("project:proj1").unwrap(), 2);
}

#[test]
fn both_down_purge_fails() {
    let stack = TestStack::new();
    stack.primary_down();
    stack.backup_down();
    let err = stack.service.purge("proj1", true).unwrap_err();
    assert!(matches!(err, Error::Purge(_)));
}

#[test]
fn purge_leaves_other_projects() {
    let stack = TestStack::new();
    stack.write_values("proj1", &["a"]);
    stack.write_values("proj2", &["b"]);

    stack.service.purge("proj1", true).unwrap();
    let page = stack.service.read("proj2", &ReadRequest::default()).unwrap();
    assert_eq!(values(&page.items), vec![json!("b")]);
    assert_eq!(stack.backup_count("proj2"), 1);
}
