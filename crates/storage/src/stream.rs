//! Stream data structure
//!
//! One append-only log: entries ordered by [`StreamId`], ids assigned on
//! append from the wall clock.

use mnemo_core::{StreamEntry, StreamFields, StreamId};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// An append-only stream of field/value entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stream {
    /// Entries ordered by id
    entries: BTreeMap<StreamId, StreamFields>,
    /// Last generated id
    last_id: StreamId,
}

impl Stream {
    /// Create a new empty stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry with an id derived from `now_ms`
    pub fn add_at(&mut self, now_ms: u64, fields: StreamFields) -> StreamId {
        let id = StreamId::next_after(self.last_id, now_ms);
        self.entries.insert(id, fields);
        self.last_id = id;
        id
    }

    /// Append an entry stamped with the current time
    pub fn add(&mut self, fields: StreamFields) -> StreamId {
        self.add_at(now_millis(), fields)
    }

    /// Entries with `start <= id <= end`, oldest first
    pub fn range(&self, start: StreamId, end: StreamId) -> Vec<StreamEntry> {
        if start > end {
            return Vec::new();
        }
        self.entries
            .range(start..=end)
            .map(|(id, fields)| StreamEntry {
                id: *id,
                fields: fields.clone(),
            })
            .collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the stream has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Id of the newest entry
    pub fn last_id(&self) -> StreamId {
        self.last_id
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
