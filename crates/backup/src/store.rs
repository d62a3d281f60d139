//! SQLite-backed backup store

use mnemo_core::{
    BackupRow, NewBackupRow, PageWindow, RelationalBackupStore, RowFilter, StoreError, StoreResult,
};
use parking_lot::Mutex;
use rusqlite::{params, params_from_iter, Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::schema;
use crate::sql;

/// Backup store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupConfig {
    /// Database file; its parent directory is created if absent
    pub path: PathBuf,
    /// Use write-ahead logging
    pub wal_mode: bool,
    /// How long a call waits on a locked database
    pub busy_timeout: Duration,
}

impl BackupConfig {
    /// Defaults for a database at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            wal_mode: true,
            busy_timeout: Duration::from_millis(5000),
        }
    }
}

/// Backup table over one SQLite connection
pub struct SqliteBackupStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteBackupStore {
    /// Open (or create) the database described by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or SQLite
    /// refuses to open or initialize the file.
    pub fn open(config: &BackupConfig) -> StoreResult<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Backend(format!(
                        "cannot create backup directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = Connection::open_with_flags(
            &config.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(backend)?;
        conn.busy_timeout(config.busy_timeout).map_err(backend)?;
        if config.wal_mode {
            conn.pragma_update(None, "journal_mode", "WAL")
                .map_err(backend)?;
        }
        schema::init(&conn).map_err(backend)?;

        tracing::info!(path = %config.path.display(), "backup store opened");
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(config.path.clone()),
        })
    }

    /// A private in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(backend)?;
        schema::init(&conn).map_err(backend)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl RelationalBackupStore for SqliteBackupStore {
    fn insert(&self, row: &NewBackupRow) -> StoreResult<i64> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO memory (project, timestamp, data, metadata) VALUES (?1, ?2, ?3, ?4)",
            params![row.project, row.timestamp, row.data, row.metadata],
        )
        .map_err(backend)?;
        Ok(conn.last_insert_rowid())
    }

    fn select(&self, filter: &RowFilter, page: PageWindow) -> StoreResult<Vec<BackupRow>> {
        let query = sql::select(filter, page);
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(&query.sql).map_err(backend)?;
        let rows = stmt
            .query_map(params_from_iter(query.params.iter()), |row| {
                Ok(BackupRow {
                    id: row.get(0)?,
                    project: row.get(1)?,
                    timestamp: row.get(2)?,
                    data: row.get(3)?,
                    metadata: row.get(4)?,
                })
            })
            .map_err(backend)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(backend)
    }

    fn count(&self, filter: &RowFilter) -> StoreResult<u64> {
        let query = sql::count(filter);
        let conn = self.conn.lock();
        let n: i64 = conn
            .query_row(&query.sql, params_from_iter(query.params.iter()), |row| {
                row.get(0)
            })
            .map_err(backend)?;
        Ok(n.max(0) as u64)
    }

    fn delete_project(&self, project: &str) -> StoreResult<u64> {
        let conn = self.conn.lock();
        let deleted = conn
            .execute("DELETE FROM memory WHERE project = ?1", params![project])
            .map_err(backend)?;
        Ok(deleted as u64)
    }

    fn ping(&self) -> StoreResult<()> {
        let conn = self.conn.lock();
        let one: i64 = conn
            .query_row("SELECT 1", [], |row| row.get(0))
            .map_err(backend)?;
        if one == 1 {
            Ok(())
        } else {
            Err(StoreError::Backend(format!("SELECT 1 returned {one}")))
        }
    }
}

fn backend(e: rusqlite::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}
