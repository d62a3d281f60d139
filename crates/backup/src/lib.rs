//! Secondary store for Mnemo
//!
//! A single SQLite table, `memory`, mirrors every record that made it past
//! the primary append. Reads and queries land here when the primary has no
//! log for a project or fails.
//!
//! - schema: table and index creation
//! - sql: `WHERE` clause construction from a [`RowFilter`](mnemo_core::RowFilter)
//! - store: [`SqliteBackupStore`], the `RelationalBackupStore` implementation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod schema;
pub mod sql;
pub mod store;

pub use store::{BackupConfig, SqliteBackupStore};
