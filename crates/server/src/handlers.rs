//! HTTP route handlers.
//!
//! Engine calls are synchronous and may block on SQLite, so each one runs on
//! the blocking pool.

use std::sync::Arc;

use axum::extract::{Path, Query, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use mnemo_core::RecordPage;
use mnemo_engine::{HealthReport, MemoryService, PurgeReport, QueryPage, WriteReceipt};
use serde::Serialize;

use crate::error::{ApiError, Operation};
use crate::request::{PurgeParams, QueryBody, ReadParams, WriteBody};

/// Header carrying the shared secret
pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: MemoryService,
    pub api_key: Arc<str>,
}

impl AppState {
    pub fn new(service: MemoryService, api_key: impl Into<Arc<str>>) -> Self {
        Self {
            service,
            api_key: api_key.into(),
        }
    }
}

/// Response of a successful write
#[derive(Debug, Serialize)]
pub struct WriteResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub receipt: WriteReceipt,
}

/// Reject requests without the configured `X-API-KEY`
pub async fn require_api_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    if presented != Some(state.api_key.as_ref()) {
        tracing::debug!(path = %request.uri().path(), "rejected request with bad API key");
        return Err(ApiError::unauthorized());
    }
    Ok(next.run(request).await)
}

async fn blocking<T, F>(op: Operation, f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> mnemo_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(|e| ApiError::engine(op, e)),
        Err(e) => {
            tracing::error!(operation = ?op, error = %e, "engine task failed");
            Err(ApiError::internal())
        }
    }
}

/// Handle POST /memory/{project}/write
pub async fn handle_write(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Json(body): Json<WriteBody>,
) -> Result<Json<WriteResponse>, ApiError> {
    let service = state.service;
    let receipt = blocking(Operation::Write, move || {
        service.write(&project, body.data, body.metadata)
    })
    .await?;
    Ok(Json(WriteResponse {
        status: "success",
        receipt,
    }))
}

/// Handle GET /memory/{project}/read
pub async fn handle_read(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Query(params): Query<ReadParams>,
) -> Result<Json<RecordPage>, ApiError> {
    let service = state.service;
    let request = params.into_request();
    let page = blocking(Operation::Read, move || service.read(&project, &request)).await?;
    Ok(Json(page))
}

/// Handle POST /memory/{project}/query
pub async fn handle_query(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Json(body): Json<QueryBody>,
) -> Result<Json<QueryPage>, ApiError> {
    let service = state.service;
    let request = body.into_request();
    let page = blocking(Operation::Query, move || service.query(&project, &request)).await?;
    Ok(Json(page))
}

/// Handle DELETE /memory/{project}/purge
pub async fn handle_purge(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Query(params): Query<PurgeParams>,
) -> Result<Json<PurgeReport>, ApiError> {
    let service = state.service;
    let report = blocking(Operation::Purge, move || {
        service.purge(&project, params.confirm)
    })
    .await?;
    Ok(Json(report))
}

/// Handle GET /health
pub async fn handle_health(State(state): State<AppState>) -> Result<Json<HealthReport>, ApiError> {
    let service = state.service;
    let report = blocking(Operation::Health, move || Ok(service.health())).await?;
    Ok(Json(report))
}
