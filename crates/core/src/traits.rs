//! Store adapter traits
//!
//! The engine talks to its two stores only through these traits, so either
//! side can be swapped (in-process stream store, SQLite, test fakes) without
//! touching the ingest, read, query or purge paths.
//!
//! Thread safety: all methods must be safe to call concurrently from
//! multiple threads (requires Send + Sync). Each call is atomic on its own;
//! nothing spans two calls or two stores.

use crate::error::StoreResult;
use crate::store_types::{BackupRow, NewBackupRow, PageWindow, RowFilter, StreamEntry, StreamFields};
use crate::stream_id::StreamId;

/// Primary store: per-key append-only streams
pub trait AppendLogStore: Send + Sync {
    /// Append an entry, creating the stream if needed
    ///
    /// Returns the id assigned by the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    fn append(&self, key: &str, fields: StreamFields) -> StoreResult<StreamId>;

    /// Entries with `start <= id <= end`, oldest first
    ///
    /// Bounds use the store's native syntax (see [`crate::stream_id`]).
    /// A missing stream yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidBound`](crate::StoreError::InvalidBound)
    /// if a bound cannot be interpreted.
    fn range(&self, key: &str, start: &str, end: &str) -> StoreResult<Vec<StreamEntry>>;

    /// Whether the stream exists
    fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Number of entries in the stream (0 when missing)
    fn len(&self, key: &str) -> StoreResult<u64>;

    /// Whether the stream has no entries
    fn is_empty(&self, key: &str) -> StoreResult<bool> {
        Ok(self.len(key)? == 0)
    }

    /// Drop the whole stream; `true` if it existed
    fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Liveness probe
    fn ping(&self) -> StoreResult<()>;
}

/// Secondary store: one flat table of rows for all projects
pub trait RelationalBackupStore: Send + Sync {
    /// Insert a row; returns the new row id
    fn insert(&self, row: &NewBackupRow) -> StoreResult<i64>;

    /// Rows matching `filter`, newest timestamp first, windowed by `page`
    fn select(&self, filter: &RowFilter, page: PageWindow) -> StoreResult<Vec<BackupRow>>;

    /// Number of rows matching `filter`, ignoring any window
    fn count(&self, filter: &RowFilter) -> StoreResult<u64>;

    /// Delete every row of a project; returns the number deleted
    fn delete_project(&self, project: &str) -> StoreResult<u64>;

    /// Liveness probe
    fn ping(&self) -> StoreResult<()>;
}
