//! The record model served to callers

use crate::project::ProjectId;
use serde::{Deserialize, Serialize};

/// JSON object payload
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// One stored record, as returned by reads and queries
///
/// `id` is store-specific: a `<ms>-<seq>` stream id when the record came from
/// the primary log, a decimal row id when it came from the backup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Store-assigned id
    pub id: String,
    /// Owning project
    pub project: ProjectId,
    /// Server-assigned ISO-8601 timestamp
    pub timestamp: String,
    /// Caller payload
    pub data: Payload,
    /// Optional caller metadata
    pub metadata: Option<Payload>,
}

/// A page of records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPage {
    /// Records on this page
    pub items: Vec<MemoryRecord>,
    /// Total reported by the serving store (see the read resolver for its meaning)
    pub total: u64,
    /// Requested page size
    pub limit: usize,
    /// Requested offset
    pub offset: usize,
}

impl RecordPage {
    /// An empty page echoing the requested window
    pub fn empty(limit: usize, offset: usize) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            limit,
            offset,
        }
    }
}
