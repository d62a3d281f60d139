//! High-level handle over every memory operation.
//!
//! [`MemoryService`] bundles the ingest writer, read resolver, query engine
//! and purge coordinator over one [`StoreContext`]. It is cheap to clone;
//! clones share the same stores.
//!
//! # Example
//!
//! ```ignore
//! use mnemo_engine::{MemoryService, ReadRequest};
//!
//! let service = MemoryService::ephemeral()?;
//! service.write("proj1", data, None)?;
//! let page = service.read("proj1", &ReadRequest::default())?;
//! ```

use mnemo_core::{Payload, RecordPage, Result};
use tracing::info;

use crate::config::MnemoConfig;
use crate::context::StoreContext;
use crate::health::{self, HealthReport};
use crate::ingest::{IngestOutcome, IngestWriter, WriteReceipt};
use crate::purge::{PurgeCoordinator, PurgeReport};
use crate::query::{QueryEngine, QueryPage, QueryRequest};
use crate::read::{ReadRequest, ReadResolver};

/// Entry point for memory operations
#[derive(Debug, Clone)]
pub struct MemoryService {
    stores: StoreContext,
    writer: IngestWriter,
    reader: ReadResolver,
    queries: QueryEngine,
    purger: PurgeCoordinator,
}

impl MemoryService {
    /// Build every component over the given stores
    pub fn new(stores: StoreContext) -> Self {
        Self {
            writer: IngestWriter::new(stores.clone()),
            reader: ReadResolver::new(stores.clone()),
            queries: QueryEngine::new(stores.clone()),
            purger: PurgeCoordinator::new(stores.clone()),
            stores,
        }
    }

    /// Open the configured stores
    ///
    /// # Errors
    ///
    /// Returns an error if the backup database cannot be opened.
    pub fn open(config: &MnemoConfig) -> Result<Self> {
        let stores = StoreContext::open(config)?;
        info!(
            primary = ?config.primary.backend,
            backup = %config.backup.path.display(),
            "memory stores opened"
        );
        Ok(Self::new(stores))
    }

    /// Service over in-process stores
    pub fn ephemeral() -> Result<Self> {
        Ok(Self::new(StoreContext::ephemeral()?))
    }

    /// Underlying stores
    pub fn stores(&self) -> &StoreContext {
        &self.stores
    }

    /// Record new data for a project
    pub fn write(
        &self,
        project: &str,
        data: Payload,
        metadata: Option<Payload>,
    ) -> Result<WriteReceipt> {
        self.ingest(project, data, metadata)
            .map(|outcome| outcome.receipt)
    }

    /// Like [`write`](Self::write), also reporting the mirror outcome
    pub fn ingest(
        &self,
        project: &str,
        data: Payload,
        metadata: Option<Payload>,
    ) -> Result<IngestOutcome> {
        self.writer.write(project, data, metadata)
    }

    /// Read a page of a project's records
    pub fn read(&self, project: &str, request: &ReadRequest) -> Result<RecordPage> {
        self.reader.read(project, request)
    }

    /// Search a project's records
    pub fn query(&self, project: &str, request: &QueryRequest) -> Result<QueryPage> {
        self.queries.query(project, request)
    }

    /// Delete every record of a project
    pub fn purge(&self, project: &str, confirm: bool) -> Result<PurgeReport> {
        self.purger.purge(project, confirm)
    }

    /// Ping both stores
    pub fn health(&self) -> HealthReport {
        health::check(&self.stores)
    }
}
