//! Stream entry ids and range bounds
//!
//! Entry ids are `<ms>-<seq>`: the append time in milliseconds since the
//! epoch and a sequence number within that millisecond. Ids order first by
//! `ms`, then by `seq`.
//!
//! Range bounds accepted by the primary store:
//! - `-` and `+`: the open ends of the log
//! - `<ms>` or `<ms>-<seq>`: an entry id
//!
//! Anything else, datetimes included, is an invalid bound. A bare
//! millisecond expands to sequence `0` as a start bound and to the largest
//! sequence as an end bound.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Open lower end of a range
pub const RANGE_MIN: &str = "-";
/// Open upper end of a range
pub const RANGE_MAX: &str = "+";

/// Stream entry id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StreamId {
    /// Milliseconds timestamp
    pub ms: u64,
    /// Sequence number within the millisecond
    pub seq: u64,
}

impl StreamId {
    /// Smallest possible id
    pub const MIN: StreamId = StreamId { ms: 0, seq: 0 };
    /// Largest possible id
    pub const MAX: StreamId = StreamId {
        ms: u64::MAX,
        seq: u64::MAX,
    };

    /// Create a stream id
    pub fn new(ms: u64, seq: u64) -> Self {
        Self { ms, seq }
    }

    /// Next id for an append at `now_ms`, given the last id in the log
    ///
    /// Ids never go backwards: if the clock stalls or steps back the
    /// sequence of the last id is bumped instead.
    pub fn next_after(last: StreamId, now_ms: u64) -> StreamId {
        if now_ms > last.ms {
            StreamId::new(now_ms, 0)
        } else {
            StreamId::new(last.ms, last.seq + 1)
        }
    }

    /// Parse a start bound of a range
    pub fn parse_start(bound: &str) -> StoreResult<StreamId> {
        parse_bound(bound, 0)
    }

    /// Parse an end bound of a range
    pub fn parse_end(bound: &str) -> StoreResult<StreamId> {
        parse_bound(bound, u64::MAX)
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ms, self.seq)
    }
}

impl FromStr for StreamId {
    type Err = StoreError;

    fn from_str(s: &str) -> StoreResult<Self> {
        let (ms, seq) = s
            .split_once('-')
            .ok_or_else(|| StoreError::InvalidBound(s.to_string()))?;
        let ms = ms
            .parse()
            .map_err(|_| StoreError::InvalidBound(s.to_string()))?;
        let seq = seq
            .parse()
            .map_err(|_| StoreError::InvalidBound(s.to_string()))?;
        Ok(StreamId { ms, seq })
    }
}

fn parse_bound(bound: &str, default_seq: u64) -> StoreResult<StreamId> {
    match bound {
        RANGE_MIN => Ok(StreamId::MIN),
        RANGE_MAX => Ok(StreamId::MAX),
        _ => match bound.parse::<u64>() {
            Ok(ms) => Ok(StreamId::new(ms, default_seq)),
            Err(_) => bound.parse::<StreamId>(),
        },
    }
}
