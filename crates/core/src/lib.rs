//! Core types and traits for Mnemo
//!
//! This crate defines the foundational types used throughout the system:
//! - ProjectId: Validated project identifier
//! - MemoryRecord / RecordPage: The record model served to callers
//! - StreamId: Primary log entry id and range-bound parsing
//! - Store types: Stream entries, backup rows, row filters
//! - Traits: Store adapter contracts (AppendLogStore, RelationalBackupStore)
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod project;
pub mod record;
pub mod store_types;
pub mod stream_id;
pub mod traits;

pub use error::{Error, Result, StoreError, StoreResult};
pub use project::{ProjectId, STREAM_KEY_PREFIX};
pub use record::{MemoryRecord, Payload, RecordPage};
pub use store_types::{
    BackupRow, NewBackupRow, PageWindow, RowFilter, StreamEntry, StreamFields,
};
pub use stream_id::{StreamId, RANGE_MAX, RANGE_MIN};
pub use traits::{AppendLogStore, RelationalBackupStore};
