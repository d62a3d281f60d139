//! Memory engine for Mnemo
//!
//! This crate implements every operation over the two stores:
//! - Ingest: primary append, then best-effort mirror to the backup
//! - Read: paged, time-windowed reads with backup fallback
//! - Query: substring and field filters, divergent per store
//! - Purge: confirmed whole-project deletion from both stores
//! - Health: store liveness
//!
//! The engine only sees the stores through the `mnemo-core` traits, held in
//! a [`StoreContext`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod config;
pub mod context;
pub mod health;
pub mod ingest;
pub mod purge;
pub mod query;
pub mod read;
pub mod service;

pub use config::{MnemoConfig, PrimaryBackend, CONFIG_FILE_NAME, DEFAULT_API_KEY};
pub use context::StoreContext;
pub use health::{HealthReport, HealthStatus, StoreHealth};
pub use ingest::{IngestOutcome, IngestWriter, MirrorOutcome, WriteReceipt};
pub use purge::{PurgeCoordinator, PurgeReport, PurgeStatus};
pub use query::{QueryEngine, QueryPage, QueryRequest};
pub use read::{ReadRequest, ReadResolver, DEFAULT_LIMIT};
pub use service::MemoryService;
