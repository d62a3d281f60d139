//! Primary store for Mnemo
//!
//! This crate implements the append-only log side of the system:
//! - RedisStreamStore: project logs as Redis streams, the production backend
//! - StreamStore: DashMap of named streams in process, for tests and
//!   ephemeral services
//! - Stream: one ordered log with `<ms>-<seq>` entry ids
//!
//! Both stores implement `AppendLogStore` and accept the same range bounds.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod redis_stream;
pub mod store;
pub mod stream;

pub use redis_stream::{RedisConfig, RedisStreamStore};
pub use store::{StreamStore, StreamStoreConfig};
pub use stream::Stream;
