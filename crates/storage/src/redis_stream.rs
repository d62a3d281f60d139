//! Redis-backed stream store
//!
//! Each project log is a Redis stream. Entries are appended with
//! `XADD key *`, so Redis assigns the `<ms>-<seq>` ids; reads use `XRANGE`.
//!
//! # Connection
//!
//! One synchronous connection, opened on first use and kept behind a mutex.
//! An I/O failure or a dropped connection discards it; the next call opens a
//! fresh one. Callers see every failure as [`StoreError::Backend`], which the
//! engine treats as "primary unavailable".

use mnemo_core::{AppendLogStore, StoreError, StoreResult, StreamEntry, StreamFields, StreamId};
use parking_lot::Mutex;
use redis::streams::StreamRangeReply;
use redis::{Client, Connection, IntoConnectionInfo, RedisError, RedisResult};
use std::time::Duration;

/// Redis connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// `AUTH` password; empty for none
    pub password: String,
    /// Logical database
    pub db: i64,
    /// Connect, read and write timeout
    pub timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            password: String::new(),
            db: 0,
            timeout: Duration::from_secs(2),
        }
    }
}

/// Stream store over a Redis server
pub struct RedisStreamStore {
    client: Client,
    conn: Mutex<Option<Connection>>,
    timeout: Duration,
}

impl RedisStreamStore {
    /// Create a store for the configured server
    ///
    /// No connection is made until the first call.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the address is not usable.
    pub fn open(config: &RedisConfig) -> StoreResult<Self> {
        let mut info = format!("redis://{}:{}", config.host, config.port)
            .into_connection_info()
            .map_err(backend)?;
        info.redis.db = config.db;
        if !config.password.is_empty() {
            info.redis.password = Some(config.password.clone());
        }
        let client = Client::open(info).map_err(backend)?;
        Ok(Self {
            client,
            conn: Mutex::new(None),
            timeout: config.timeout,
        })
    }

    fn connect(&self) -> RedisResult<Connection> {
        let conn = self.client.get_connection_with_timeout(self.timeout)?;
        conn.set_read_timeout(Some(self.timeout))?;
        conn.set_write_timeout(Some(self.timeout))?;
        tracing::debug!(timeout_ms = self.timeout.as_millis() as u64, "redis connected");
        Ok(conn)
    }

    /// Run one command on the shared connection
    fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> RedisResult<T>) -> StoreResult<T> {
        let mut guard = self.conn.lock();
        if guard.is_none() {
            *guard = Some(self.connect().map_err(backend)?);
        }
        let Some(conn) = guard.as_mut() else {
            return Err(StoreError::Backend("redis connection unavailable".to_string()));
        };
        f(conn).map_err(|e| {
            if e.is_io_error() || e.is_connection_dropped() || e.is_timeout() {
                *guard = None;
            }
            backend(e)
        })
    }
}

impl std::fmt::Debug for RedisStreamStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStreamStore")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl AppendLogStore for RedisStreamStore {
    fn append(&self, key: &str, fields: StreamFields) -> StoreResult<StreamId> {
        let mut cmd = redis::cmd("XADD");
        cmd.arg(key).arg("*");
        for (field, value) in &fields {
            cmd.arg(field).arg(value);
        }
        let id: String = self.with_conn(|conn| cmd.query(conn))?;
        tracing::trace!(key, %id, "stream append");
        id.parse()
    }

    fn range(&self, key: &str, start: &str, end: &str) -> StoreResult<Vec<StreamEntry>> {
        StreamId::parse_start(start)?;
        StreamId::parse_end(end)?;
        let reply: StreamRangeReply = self.with_conn(|conn| {
            redis::cmd("XRANGE").arg(key).arg(start).arg(end).query(conn)
        })?;
        entries_from_reply(reply)
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        self.with_conn(|conn| redis::cmd("EXISTS").arg(key).query(conn))
    }

    fn len(&self, key: &str) -> StoreResult<u64> {
        self.with_conn(|conn| redis::cmd("XLEN").arg(key).query(conn))
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        let removed: u64 = self.with_conn(|conn| redis::cmd("DEL").arg(key).query(conn))?;
        Ok(removed > 0)
    }

    fn ping(&self) -> StoreResult<()> {
        let _: String = self.with_conn(|conn| redis::cmd("PING").query(conn))?;
        Ok(())
    }
}

fn entries_from_reply(reply: StreamRangeReply) -> StoreResult<Vec<StreamEntry>> {
    reply
        .ids
        .into_iter()
        .map(|entry| {
            let fields = entry
                .map
                .iter()
                .map(|(field, value)| {
                    let value: String = redis::from_redis_value(value).map_err(backend)?;
                    Ok((field.clone(), value))
                })
                .collect::<StoreResult<StreamFields>>()?;
            Ok(StreamEntry {
                id: entry.id.parse()?,
                fields,
            })
        })
        .collect()
}

fn backend(e: RedisError) -> StoreError {
    StoreError::Backend(format!("redis: {}", e))
}
