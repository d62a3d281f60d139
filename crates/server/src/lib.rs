//! HTTP surface for Mnemo
//!
//! Routes:
//! - `POST /memory/:project/write`
//! - `GET /memory/:project/read`
//! - `POST /memory/:project/query`
//! - `DELETE /memory/:project/purge`
//! - `GET /health` (no API key)

pub mod error;
pub mod handlers;
pub mod http;
pub mod request;

pub use error::{ApiError, ErrorBody, Operation};
pub use handlers::{AppState, WriteResponse, API_KEY_HEADER};
pub use http::{router, MemoryServer};
