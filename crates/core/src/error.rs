//! Error types for Mnemo
//!
//! Two layers of errors live here:
//! - [`StoreError`]: what a store adapter reports for a single call
//! - [`Error`]: what an engine operation reports to its caller
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for store adapter calls
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failure of a single store call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A range bound the store cannot interpret
    #[error("invalid range bound: {0}")]
    InvalidBound(String),

    /// The store refused a write because it is full
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// The backend itself failed (connection, I/O, SQL)
    #[error("backend error: {0}")]
    Backend(String),

    /// Stored bytes could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Operation-level errors
///
/// | Category | Variants | Caller sees |
/// |----------|----------|-------------|
/// | Client   | `InvalidProject`, `ConfirmationRequired` | 400 |
/// | Store    | `PrimaryStore`, `SecondaryStore` | 500 |
/// | Fallback exhausted | `Read`, `Query`, `Purge` | 500 |
/// | System   | `Config`, `Internal` | 500 |
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Project identifier is empty or not alphanumeric
    #[error("invalid project id: {0:?}")]
    InvalidProject(String),

    /// Purge was requested without `confirm = true`
    #[error("confirmation required to purge project")]
    ConfirmationRequired,

    /// The primary stream store failed
    #[error("primary store error: {0}")]
    PrimaryStore(StoreError),

    /// The backup store failed
    #[error("secondary store error: {0}")]
    SecondaryStore(StoreError),

    /// A read failed on both stores
    #[error("read failed: {0}")]
    Read(String),

    /// A query failed on both stores, or a stored entry was unreadable
    #[error("query failed: {0}")]
    Query(String),

    /// A purge failed on both stores
    #[error("purge failed: {0}")]
    Purge(String),

    /// Configuration could not be loaded or is invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the caller is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidProject(_) | Error::ConfirmationRequired)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}
