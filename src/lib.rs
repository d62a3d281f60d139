//! Mnemo - per-project memory log with a durable mirror
//!
//! Records are appended to a primary stream store and mirrored, best effort,
//! into a SQLite table. Reads and queries prefer the primary and fall back to
//! the mirror when the primary fails or has no log for the project.
//!
//! # Quick Start
//!
//! ```ignore
//! use mnemo::{MemoryService, ReadRequest, QueryRequest};
//!
//! let service = MemoryService::ephemeral()?;
//! service.write("proj1", data, None)?;
//!
//! let page = service.read("proj1", &ReadRequest::default())?;
//! let hits = service.query("proj1", &QueryRequest::new("needle"))?;
//! service.purge("proj1", true)?;
//! ```
//!
//! # Architecture
//!
//! - `mnemo-core`: records, errors and the two store traits
//! - `mnemo-storage`: Redis and in-process stream stores (primary)
//! - `mnemo-backup`: SQLite mirror (secondary)
//! - `mnemo-engine`: ingest, read, query, purge and health
//! - `mnemo-server`: HTTP surface

pub use mnemo_backup::{BackupConfig, SqliteBackupStore};
pub use mnemo_core::*;
pub use mnemo_engine::*;
pub use mnemo_storage::{RedisConfig, RedisStreamStore, StreamStore, StreamStoreConfig};
