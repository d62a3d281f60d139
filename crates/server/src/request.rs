//! HTTP request types.

use mnemo_core::Payload;
use mnemo_engine::{QueryRequest, ReadRequest, DEFAULT_LIMIT};
use serde::Deserialize;

/// Body of `POST /memory/{project}/write`
#[derive(Debug, Deserialize)]
pub struct WriteBody {
    /// Record payload
    pub data: Payload,
    /// Optional metadata
    #[serde(default)]
    pub metadata: Option<Payload>,
}

/// Query parameters of `GET /memory/{project}/read`
#[derive(Debug, Default, Deserialize)]
pub struct ReadParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    /// Inclusive lower time bound
    pub start_time: Option<String>,
    /// Inclusive upper time bound
    pub end_time: Option<String>,
}

impl ReadParams {
    pub fn into_request(self) -> ReadRequest {
        ReadRequest {
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
            offset: self.offset.unwrap_or(0),
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

/// Body of `POST /memory/{project}/query`
#[derive(Debug, Deserialize)]
pub struct QueryBody {
    /// Substring to search for
    pub query: String,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    /// Field equality filters
    #[serde(default)]
    pub filters: Option<Payload>,
}

impl QueryBody {
    pub fn into_request(self) -> QueryRequest {
        QueryRequest {
            query: self.query,
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
            offset: self.offset.unwrap_or(0),
            filters: self.filters,
        }
    }
}

/// Query parameters of `DELETE /memory/{project}/purge`
#[derive(Debug, Default, Deserialize)]
pub struct PurgeParams {
    /// Must be `true` for the purge to run
    #[serde(default)]
    pub confirm: bool,
}
