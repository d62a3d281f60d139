//! In-process stream store
//!
//! # Design
//!
//! - DashMap: sharded by key, lock-free reads of unrelated keys
//! - FxHash: fast non-crypto hash for the short `project:<id>` keys
//! - Per-key streams: appends to different projects never contend
//!
//! An optional entry budget bounds the total number of entries across all
//! streams; appends past it fail with `CapacityExceeded` until a purge frees
//! room.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use mnemo_core::{AppendLogStore, StoreError, StoreResult, StreamEntry, StreamFields, StreamId};
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::stream::Stream;

type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// Stream store configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStoreConfig {
    /// Upper bound on entries across all streams (`None` = unbounded)
    pub max_entries: Option<usize>,
}

/// Append-only streams keyed by name
pub struct StreamStore {
    streams: DashMap<String, Stream, FxBuildHasher>,
    entries: AtomicUsize,
    config: StreamStoreConfig,
}

impl StreamStore {
    /// Create an unbounded store
    pub fn new() -> Self {
        Self::with_config(StreamStoreConfig::default())
    }

    /// Create a store with explicit configuration
    pub fn with_config(config: StreamStoreConfig) -> Self {
        Self {
            streams: DashMap::with_hasher(FxBuildHasher::default()),
            entries: AtomicUsize::new(0),
            config,
        }
    }

    /// Number of streams
    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    /// Number of entries across all streams
    pub fn total_entries(&self) -> usize {
        self.entries.load(Ordering::Acquire)
    }

    fn reserve_slot(&self) -> StoreResult<()> {
        let Some(max) = self.config.max_entries else {
            self.entries.fetch_add(1, Ordering::AcqRel);
            return Ok(());
        };
        self.entries
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < max).then_some(n + 1)
            })
            .map(|_| ())
            .map_err(|n| {
                StoreError::CapacityExceeded(format!("stream store holds {n} of {max} entries"))
            })
    }
}

impl Default for StreamStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AppendLogStore for StreamStore {
    fn append(&self, key: &str, fields: StreamFields) -> StoreResult<StreamId> {
        self.reserve_slot()?;
        let id = match self.streams.entry(key.to_string()) {
            Entry::Occupied(mut stream) => stream.get_mut().add(fields),
            Entry::Vacant(slot) => {
                let mut stream = Stream::new();
                let id = stream.add(fields);
                slot.insert(stream);
                id
            }
        };
        tracing::trace!(key, %id, "stream append");
        Ok(id)
    }

    fn range(&self, key: &str, start: &str, end: &str) -> StoreResult<Vec<StreamEntry>> {
        let start = StreamId::parse_start(start)?;
        let end = StreamId::parse_end(end)?;
        Ok(self
            .streams
            .get(key)
            .map(|stream| stream.range(start, end))
            .unwrap_or_default())
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.streams.contains_key(key))
    }

    fn len(&self, key: &str) -> StoreResult<u64> {
        Ok(self
            .streams
            .get(key)
            .map(|stream| stream.len() as u64)
            .unwrap_or(0))
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        match self.streams.remove(key) {
            Some((_, stream)) => {
                self.entries.fetch_sub(stream.len(), Ordering::AcqRel);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
