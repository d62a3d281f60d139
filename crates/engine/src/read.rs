//! Read resolver: ranged, paged reads over either store
//!
//! ## Source selection
//!
//! | Primary log for the project | Served by | Order | `total` |
//! |-----------------------------|-----------|-------|---------|
//! | exists | primary range scan | oldest first | length of the whole log |
//! | missing | backup select | newest first | exact count in the window |
//! | primary call fails | backup select | newest first | exact count in the window |
//!
//! On the primary path `total` ignores the time window: it is the log's full
//! length, so it can disagree with the number of records in range.
//!
//! Window bounds go to the primary as stream range bounds (`-`, `+`, `<ms>`,
//! `<ms>-<seq>`). Any other bound, an ISO datetime for instance, makes the
//! primary call fail, so such reads are answered by the backup, which
//! compares the bounds to timestamps as strings.
//!
//! When the log is missing and the backup fails too, the read returns an
//! empty page. When the primary itself failed and the backup fails too, the
//! read fails with [`Error::Read`].

use mnemo_core::{
    Error, PageWindow, ProjectId, RecordPage, Result, RowFilter, RANGE_MAX, RANGE_MIN,
};
use tracing::{debug, error, warn};

use crate::codec;
use crate::context::StoreContext;

/// Page size when the caller gives none
pub const DEFAULT_LIMIT: usize = 10;

/// Parameters of a read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRequest {
    /// Maximum records returned
    pub limit: usize,
    /// Records skipped
    pub offset: usize,
    /// Lower time bound (inclusive)
    pub start_time: Option<String>,
    /// Upper time bound (inclusive)
    pub end_time: Option<String>,
}

impl Default for ReadRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
            start_time: None,
            end_time: None,
        }
    }
}

impl ReadRequest {
    /// A read of `limit` records after skipping `offset`
    pub fn page(limit: usize, offset: usize) -> Self {
        Self {
            limit,
            offset,
            ..Self::default()
        }
    }

    /// Restrict to a time window
    pub fn with_window(mut self, start_time: Option<&str>, end_time: Option<&str>) -> Self {
        self.start_time = start_time.map(str::to_string);
        self.end_time = end_time.map(str::to_string);
        self
    }

    // Empty bounds count as absent.
    fn start(&self) -> Option<&str> {
        self.start_time.as_deref().filter(|s| !s.is_empty())
    }

    fn end(&self) -> Option<&str> {
        self.end_time.as_deref().filter(|s| !s.is_empty())
    }
}

/// Serves reads
#[derive(Debug, Clone)]
pub struct ReadResolver {
    stores: StoreContext,
}

impl ReadResolver {
    /// Create a resolver over the given stores
    pub fn new(stores: StoreContext) -> Self {
        Self { stores }
    }

    /// Read a page of a project's records
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidProject`] for a bad identifier
    /// - [`Error::Read`] if the primary failed and the backup failed after it
    /// - [`Error::Internal`] if a primary entry cannot be decoded
    pub fn read(&self, project: &str, request: &ReadRequest) -> Result<RecordPage> {
        let project = ProjectId::parse(project)?;

        match self.read_primary(&project, request) {
            Ok(Some(page)) => Ok(page),
            Ok(None) => {
                debug!(project = %project, "no primary log; reading from backup");
                match self.read_backup(&project, request) {
                    Ok(page) => Ok(page),
                    Err(e) => {
                        warn!(project = %project, error = %e, "backup read failed; returning empty page");
                        Ok(RecordPage::empty(request.limit, request.offset))
                    }
                }
            }
            Err(Error::PrimaryStore(e)) => {
                warn!(project = %project, error = %e, "primary read failed; falling back to backup");
                self.read_backup(&project, request).map_err(|e| {
                    error!(project = %project, error = %e, "backup fallback read failed");
                    Error::Read(e.to_string())
                })
            }
            Err(e) => Err(e),
        }
    }

    /// `Ok(None)` when the project has no primary log
    fn read_primary(&self, project: &ProjectId, request: &ReadRequest) -> Result<Option<RecordPage>> {
        let primary = self.stores.primary();
        let key = project.stream_key();

        if !primary.exists(&key).map_err(Error::PrimaryStore)? {
            return Ok(None);
        }

        let start = request.start().unwrap_or(RANGE_MIN);
        let end = request.end().unwrap_or(RANGE_MAX);
        let total = primary.len(&key).map_err(Error::PrimaryStore)?;
        let entries = primary.range(&key, start, end).map_err(Error::PrimaryStore)?;

        let items = entries
            .iter()
            .skip(request.offset)
            .take(request.limit)
            .map(|entry| codec::decode_entry(project, entry))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::internal(format!("undecodable primary entry: {}", e)))?;

        Ok(Some(RecordPage {
            items,
            total,
            limit: request.limit,
            offset: request.offset,
        }))
    }

    fn read_backup(&self, project: &ProjectId, request: &ReadRequest) -> Result<RecordPage> {
        let backup = self.stores.backup();
        let filter = RowFilter::for_project(project.as_str()).with_window(
            request.start().map(str::to_string),
            request.end().map(str::to_string),
        );

        let rows = backup
            .select(&filter, PageWindow::new(request.limit, request.offset))
            .map_err(Error::SecondaryStore)?;
        let total = backup.count(&filter).map_err(Error::SecondaryStore)?;
        let items = rows
            .into_iter()
            .map(|row| codec::decode_row(project, row))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::SecondaryStore)?;

        Ok(RecordPage {
            items,
            total,
            limit: request.limit,
            offset: request.offset,
        })
    }
}
