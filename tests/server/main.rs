//! HTTP API tests driven through the router with `tower::ServiceExt::oneshot`.

#[path = "../common/mod.rs"]
mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use common::*;
use mnemo_server::{router, AppState};
use tower::ServiceExt;

const KEY: &str = "test-key";

fn app_for(stack: &TestStack) -> Router {
    router(AppState::new(stack.service.clone(), KEY))
}

fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-API-KEY", KEY);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    // extractor rejections answer in plain text
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn write(app: &Router, project: &str, body: Value) -> (StatusCode, Value) {
    send(
        app,
        request(Method::POST, &format!("/memory/{project}/write"), Some(body)),
    )
    .await
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn missing_api_key_is_401() {
    let stack = TestStack::new();
    let app = app_for(&stack);
    let req = Request::builder()
        .method(Method::GET)
        .uri("/memory/proj1/read")
        .body(Body::empty())
        .unwrap();

    let (status, json) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json, json!({"error": "Invalid API key", "code": 401}));
}

#[tokio::test]
async fn wrong_api_key_is_401_and_writes_nothing() {
    let stack = TestStack::new();
    let app = app_for(&stack);
    let req = Request::builder()
        .method(Method::POST)
        .uri("/memory/proj1/write")
        .header("X-API-KEY", "nope")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"data": {"k": "v"}}"#))
        .unwrap();

    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(!stack.primary.exists("project:proj1").unwrap());
}

#[tokio::test]
async fn health_needs_no_key() {
    let stack = TestStack::new();
    let app = app_for(&stack);
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, json) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"status": "healthy", "redis": "connected", "sqlite": "connected"})
    );
}

#[tokio::test]
async fn health_reports_degraded_store() {
    let stack = TestStack::new();
    stack.backup_down();
    let app = app_for(&stack);
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (_, json) = send(&app, req).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["sqlite"], "disconnected");
}

// ============================================================================
// Operations
// ============================================================================

#[tokio::test]
async fn write_returns_receipt() {
    let stack = TestStack::new();
    let app = app_for(&stack);

    let (status, json) = write(&app, "proj1", json!({"data": {"k": "v"}, "metadata": {"m": 1}})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    assert_eq!(json["project"], "proj1");
    assert!(json["id"].as_str().unwrap().contains('-'));
    assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn write_read_query_flow() {
    let stack = TestStack::new();
    let app = app_for(&stack);
    for v in ["v1", "v2", "v3"] {
        let (status, _) = write(&app, "proj1", json!({"data": {"k": v}})).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, page) = send(
        &app,
        request(Method::GET, "/memory/proj1/read?limit=2&offset=1", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 3);
    assert_eq!(page["limit"], 2);
    assert_eq!(page["offset"], 1);
    assert_eq!(page["items"][0]["data"]["k"], "v2");
    assert_eq!(page["items"][1]["data"]["k"], "v3");
    assert_eq!(page["items"][0]["metadata"], json!({}));

    let (status, found) = send(
        &app,
        request(
            Method::POST,
            "/memory/proj1/query",
            Some(json!({"query": "v2", "filters": {}})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["total"], 1);
    assert_eq!(found["query"], "v2");
    assert_eq!(found["limit"], 10);
    assert_eq!(found["items"][0]["data"]["k"], "v2");
}

#[tokio::test]
async fn read_defaults_and_empty_project() {
    let stack = TestStack::new();
    let app = app_for(&stack);
    let (status, page) = send(&app, request(Method::GET, "/memory/nobody/read", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page, json!({"items": [], "total": 0, "limit": 10, "offset": 0}));
}

#[tokio::test]
async fn purge_requires_confirmation() {
    let stack = TestStack::new();
    let app = app_for(&stack);
    write(&app, "proj1", json!({"data": {"k": "v"}})).await;

    let (status, json) = send(&app, request(Method::DELETE, "/memory/proj1/purge", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        json!({
            "error": "Confirmation required",
            "code": 400,
            "message": "Set confirm=true to purge all memory data"
        })
    );
    assert!(stack.primary.exists("project:proj1").unwrap());

    let (status, json) = send(
        &app,
        request(Method::DELETE, "/memory/proj1/purge?confirm=true", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    assert_eq!(json["redis_deleted"], true);
    assert_eq!(json["sqlite_deleted"], 1);
    assert!(json["timestamp"].is_string());
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn invalid_project_is_400() {
    let stack = TestStack::new();
    let app = app_for(&stack);
    let (status, json) = write(&app, "bad-id", json!({"data": {}})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({"error": "Invalid project ID", "code": 400}));
}

#[tokio::test]
async fn primary_failure_on_write_is_500() {
    let stack = TestStack::new();
    stack.primary_down();
    let app = app_for(&stack);
    let (status, json) = write(&app, "proj1", json!({"data": {"k": "v"}})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({"error": "Memory storage error", "code": 500}));
}

#[tokio::test]
async fn both_stores_down_read_is_500() {
    let stack = TestStack::new();
    stack.primary_down();
    stack.backup_down();
    let app = app_for(&stack);
    let (status, json) = send(&app, request(Method::GET, "/memory/proj1/read", None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Memory retrieval error");
}

#[tokio::test]
async fn both_stores_down_query_and_purge_are_500() {
    let stack = TestStack::new();
    stack.primary_down();
    stack.backup_down();
    let app = app_for(&stack);

    let (status, json) = send(
        &app,
        request(Method::POST, "/memory/proj1/query", Some(json!({"query": "x"}))),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Memory query error");

    let (status, json) = send(
        &app,
        request(Method::DELETE, "/memory/proj1/purge?confirm=true", None),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Memory purge error");
}

#[tokio::test]
async fn non_object_data_is_rejected() {
    let stack = TestStack::new();
    let app = app_for(&stack);
    let (status, _) = write(&app, "proj1", json!({"data": [1, 2]})).await;
    assert!(status.is_client_error());
    assert!(!stack.primary.exists("project:proj1").unwrap());
}
