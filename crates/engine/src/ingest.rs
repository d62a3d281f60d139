//! Ingest writer: primary append, then best-effort mirror
//!
//! The primary append decides the outcome of a write. The backup insert is
//! tried exactly once afterwards; whatever happens to it is logged and
//! recorded in [`MirrorOutcome`], never returned as an error.

use mnemo_core::{Error, Payload, ProjectId, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::codec;
use crate::context::StoreContext;

/// What the caller gets back from a write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteReceipt {
    /// Primary entry id
    pub id: String,
    /// Owning project
    pub project: ProjectId,
    /// Timestamp shared by both stores
    pub timestamp: String,
}

/// Result of the backup insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorOutcome {
    /// Row inserted with this id
    Mirrored(i64),
    /// Insert failed; the write still succeeded
    Failed(String),
}

impl MirrorOutcome {
    /// Whether the backup has the record
    pub fn is_mirrored(&self) -> bool {
        matches!(self, MirrorOutcome::Mirrored(_))
    }
}

/// Full outcome of an ingest: the receipt plus the mirror result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Caller-visible result
    pub receipt: WriteReceipt,
    /// Backup insert result
    pub mirror: MirrorOutcome,
}

/// Writes new records
#[derive(Debug, Clone)]
pub struct IngestWriter {
    stores: StoreContext,
}

impl IngestWriter {
    /// Create a writer over the given stores
    pub fn new(stores: StoreContext) -> Self {
        Self { stores }
    }

    /// Append a record to the project's log and mirror it
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidProject`] for a bad identifier
    /// - [`Error::PrimaryStore`] if the append fails; the backup is not touched
    pub fn write(
        &self,
        project: &str,
        data: Payload,
        metadata: Option<Payload>,
    ) -> Result<IngestOutcome> {
        let project = ProjectId::parse(project)?;
        let timestamp = codec::timestamp_now();

        let fields = codec::encode_entry(&data, metadata.as_ref(), &timestamp)
            .map_err(|e| Error::internal(e.to_string()))?;
        let id = self
            .stores
            .primary()
            .append(&project.stream_key(), fields)
            .map_err(Error::PrimaryStore)?;
        debug!(project = %project, %id, "appended to primary log");

        let mirror = self.mirror(&project, &data, metadata.as_ref(), &timestamp);

        Ok(IngestOutcome {
            receipt: WriteReceipt {
                id: id.to_string(),
                project,
                timestamp,
            },
            mirror,
        })
    }

    fn mirror(
        &self,
        project: &ProjectId,
        data: &Payload,
        metadata: Option<&Payload>,
        timestamp: &str,
    ) -> MirrorOutcome {
        let inserted = codec::encode_row(project, data, metadata, timestamp)
            .and_then(|row| self.stores.backup().insert(&row));
        match inserted {
            Ok(row_id) => MirrorOutcome::Mirrored(row_id),
            Err(e) => {
                warn!(project = %project, error = %e, "backup insert failed; record kept in primary only");
                MirrorOutcome::Failed(e.to_string())
            }
        }
    }
}
