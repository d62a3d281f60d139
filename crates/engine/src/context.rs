//! Store handles shared by every component
//!
//! Built once at startup and cloned into each component; clones share the
//! same underlying stores.

use mnemo_backup::SqliteBackupStore;
use mnemo_core::{AppendLogStore, Error, RelationalBackupStore, Result};
use mnemo_storage::{RedisStreamStore, StreamStore};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{MnemoConfig, PrimaryBackend};

/// The primary and secondary store of one service instance
#[derive(Clone)]
pub struct StoreContext {
    primary: Arc<dyn AppendLogStore>,
    backup: Arc<dyn RelationalBackupStore>,
}

impl StoreContext {
    /// Wrap existing stores
    pub fn new(primary: Arc<dyn AppendLogStore>, backup: Arc<dyn RelationalBackupStore>) -> Self {
        Self { primary, backup }
    }

    /// Open both stores as configured
    ///
    /// An unreachable Redis server is logged, not fatal: the primary is
    /// retried on every call and reads fall back to the backup meanwhile.
    ///
    /// # Errors
    ///
    /// Returns an error if the Redis address is unusable or the backup
    /// database cannot be opened.
    pub fn open(config: &MnemoConfig) -> Result<Self> {
        let primary: Arc<dyn AppendLogStore> = match config.primary.backend {
            PrimaryBackend::Redis => {
                let redis = config.redis_config();
                let store = RedisStreamStore::open(&redis).map_err(|e| {
                    Error::config(format!(
                        "cannot configure redis at {}:{}: {}",
                        redis.host, redis.port, e
                    ))
                })?;
                match store.ping() {
                    Ok(()) => info!(
                        host = %redis.host,
                        port = redis.port,
                        db = redis.db,
                        "redis primary connected"
                    ),
                    Err(e) => warn!(
                        host = %redis.host,
                        port = redis.port,
                        error = %e,
                        "redis primary unreachable"
                    ),
                }
                Arc::new(store)
            }
            PrimaryBackend::Memory => {
                info!("in-process primary store; logs are lost on restart");
                Arc::new(StreamStore::with_config(config.stream_store_config()))
            }
        };
        let backup = SqliteBackupStore::open(&config.backup_config()).map_err(|e| {
            Error::config(format!(
                "cannot open backup store '{}': {}",
                config.backup.path.display(),
                e
            ))
        })?;
        Ok(Self::new(primary, Arc::new(backup)))
    }

    /// In-process stores only; nothing touches the disk
    pub fn ephemeral() -> Result<Self> {
        let backup = SqliteBackupStore::open_in_memory()
            .map_err(|e| Error::internal(format!("cannot open in-memory backup: {}", e)))?;
        Ok(Self::new(Arc::new(StreamStore::new()), Arc::new(backup)))
    }

    /// Primary store
    pub fn primary(&self) -> &dyn AppendLogStore {
        self.primary.as_ref()
    }

    /// Secondary store
    pub fn backup(&self) -> &dyn RelationalBackupStore {
        self.backup.as_ref()
    }
}

impl std::fmt::Debug for StoreContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreContext").finish_non_exhaustive()
    }
}
