//! Types exchanged with the store adapters
//!
//! Both stores hold text, not structured values: the primary log keeps
//! string field/value pairs per entry, the backup table keeps JSON text
//! columns. Encoding to and from [`MemoryRecord`](crate::MemoryRecord)
//! happens in the engine.

use crate::stream_id::StreamId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field/value pairs of one stream entry
pub type StreamFields = BTreeMap<String, String>;

/// One entry of a primary log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEntry {
    /// Store-assigned id
    pub id: StreamId,
    /// Field/value pairs as appended
    pub fields: StreamFields,
}

/// A row to insert into the backup table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBackupRow {
    /// Owning project
    pub project: String,
    /// Timestamp shared with the primary entry
    pub timestamp: String,
    /// JSON text of the payload
    pub data: String,
    /// JSON text of the metadata, `None` when there is none
    pub metadata: Option<String>,
}

/// A row read back from the backup table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRow {
    /// Autoincrement row id
    pub id: i64,
    /// Owning project
    pub project: String,
    /// Timestamp shared with the primary entry
    pub timestamp: String,
    /// JSON text of the payload
    pub data: String,
    /// JSON text of the metadata
    pub metadata: Option<String>,
}

/// Row predicate for backup selects and counts
///
/// All conditions are conjunctive. Every entry of `contains` is a `LIKE`
/// pattern that must match the `data` column or the `metadata` column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    /// Rows of this project only
    pub project: String,
    /// `timestamp >= start_time`
    pub start_time: Option<String>,
    /// `timestamp <= end_time`
    pub end_time: Option<String>,
    /// `(data LIKE p OR metadata LIKE p)` for each pattern
    pub contains: Vec<String>,
}

impl RowFilter {
    /// Filter on a project only
    pub fn for_project(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            ..Self::default()
        }
    }

    /// Restrict to a timestamp window
    pub fn with_window(mut self, start_time: Option<String>, end_time: Option<String>) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    /// Add a `LIKE` pattern over data or metadata
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.contains.push(pattern.into());
        self
    }
}

/// `LIMIT` / `OFFSET` applied by a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Maximum rows
    pub limit: usize,
    /// Rows skipped
    pub offset: usize,
}

impl PageWindow {
    /// Create a window
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }
}
