//! Behavior when one store is unavailable.

use crate::common::*;

#[test]
fn primary_down_read_serves_mirror() {
    let stack = TestStack::new();
    stack
        .service
        .write("proj1", obj(json!({"k": "v"})), None)
        .unwrap();
    stack.primary_down();

    let page = stack.service.read("proj1", &ReadRequest::default()).unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].data, obj(json!({"k": "v"})));
    // the mirror stores no metadata for an absent one
    assert!(page.items[0].metadata.is_none());
}

#[test]
fn both_down_read_fails() {
    let stack = TestStack::new();
    stack.primary_down();
    stack.backup_down();
    let err = stack
        .service
        .read("proj1", &ReadRequest::default())
        .unwrap_err();
    assert!(matches!(err, Error::Read(_)));
}

#[test]
fn primary_down_query_uses_like_patterns() {
    let stack = TestStack::new();
    stack.seed_backup("proj1", "2026-01-01T00:00:01.000000Z", json!({"kind": "note", "text": "alpha"}));
    stack.seed_backup("proj1", "2026-01-01T00:00:02.000000Z", json!({"kind": "task", "text": "alpha beta"}));
    stack.seed_backup("proj1", "2026-01-01T00:00:03.000000Z", json!({"kind": "note", "text": "gamma"}));
    stack.primary_down();

    let page = stack
        .service
        .query("proj1", &QueryRequest::new("alpha"))
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items[0].data["kind"], json!("task"));
    assert_eq!(page.query, "alpha");

    // stored text reads `"kind": "note"`, the pattern `%"kind":"note"%`
    let request = QueryRequest::new("alpha").with_filters(obj(json!({"kind": "note"})));
    let page = stack.service.query("proj1", &request).unwrap();
    assert_eq!(page.total, 0);
    assert!(page.items.is_empty());
}

#[test]
fn mirror_filter_misses_rows_written_by_service() {
    let stack = TestStack::new();
    stack
        .service
        .write("proj1", obj(json!({"kind": "todo"})), Some(obj(json!({"kind": "todo"}))))
        .unwrap();
    let request = QueryRequest::new("todo").with_filters(obj(json!({"kind": "todo"})));
    assert_eq!(stack.service.query("proj1", &request).unwrap().total, 1);

    stack.primary_down();
    let page = stack.service.query("proj1", &request).unwrap();
    assert_eq!(page.total, 0);
    assert_eq!(stack.service.query("proj1", &QueryRequest::new("todo")).unwrap().total, 1);
}

#[test]
fn mirror_query_matches_spaced_text() {
    let stack = TestStack::new();
    stack
        .service
        .write("proj1", obj(json!({"k": "v2"})), None)
        .unwrap();
    stack.primary_down();

    let page = stack
        .service
        .query("proj1", &QueryRequest::new(r#""k": "v2""#))
        .unwrap();
    assert_eq!(page.total, 1);
    assert!(page.items[0].id.parse::<i64>().is_ok());
}

#[test]
fn iso_window_read_falls_back_to_mirror() {
    let stack = TestStack::new();
    stack.write_values("proj1", &["a", "b"]);

    let request = ReadRequest::default().with_window(Some("2000-01-01"), Some("2999-12-31"));
    let page = stack.service.read("proj1", &request).unwrap();
    assert_eq!(page.total, 2);
    assert!(page.items.iter().all(|r| r.id.parse::<i64>().is_ok()));
}

#[test]
fn mirror_filter_on_number_is_textual() {
    let stack = TestStack::new();
    stack.seed_backup("proj1", "2026-01-01T00:00:01.000000Z", json!({"n": 5}));
    stack.primary_down();

    // the mirror pattern quotes the value, so a bare JSON number never matches
    let request = QueryRequest::new("").with_filters(obj(json!({"n": 5})));
    let page = stack.service.query("proj1", &request).unwrap();
    assert_eq!(page.total, 0);
}

#[test]
fn primary_and_mirror_answer_filters_differently() {
    let stack = TestStack::new();
    stack
        .service
        .write("proj1", obj(json!({"n": 5})), None)
        .unwrap();
    let request = QueryRequest::new("").with_filters(obj(json!({"n": 5})));

    assert_eq!(stack.service.query("proj1", &request).unwrap().total, 1);
    stack.primary_down();
    assert_eq!(stack.service.query("proj1", &request).unwrap().total, 0);
}

#[test]
fn both_down_query_fails() {
    let stack = TestStack::new();
    stack.primary_down();
    stack.backup_down();
    let err = stack
        .service
        .query("proj1", &QueryRequest::new("x"))
        .unwrap_err();
    assert!(matches!(err, Error::Query(_)));
}

#[test]
fn health_tracks_store_state() {
    use mnemo::{HealthStatus, StoreHealth};

    let stack = TestStack::new();
    assert_eq!(stack.service.health().status, HealthStatus::Healthy);

    stack.backup_down();
    let report = stack.service.health();
    assert_eq!(report.status, HealthStatus::Degraded);
    assert_eq!(report.primary, StoreHealth::Connected);
    assert_eq!(report.backup, StoreHealth::Disconnected);

    stack.primary_down();
    assert_eq!(stack.service.health().status, HealthStatus::Unhealthy);

    stack.backup.set_up(true);
    assert_eq!(stack.service.health().status, HealthStatus::Degraded);
}
