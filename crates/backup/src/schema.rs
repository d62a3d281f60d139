//! Backup table schema

use rusqlite::Connection;

/// Name of the backup table
pub const TABLE: &str = "memory";

/// Create the backup table if it does not exist
pub fn init(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS memory (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            project TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            data TEXT NOT NULL,
            metadata TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_memory_project_timestamp
            ON memory (project, timestamp);",
    )
}
