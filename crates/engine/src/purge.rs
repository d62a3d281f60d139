//! Purge coordinator: whole-project deletion from both stores
//!
//! The two deletes are independent. Neither is retried, and one failing does
//! not stop the other; the report says which side did what.

use mnemo_core::{Error, ProjectId, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::codec;
use crate::context::StoreContext;

/// Overall purge status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurgeStatus {
    /// Both stores purged
    Success,
    /// One store failed
    Partial,
}

/// Result of a purge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeReport {
    /// `success` or `partial`
    pub status: PurgeStatus,
    /// Purged project
    pub project: ProjectId,
    /// Whether the primary log existed and was removed
    #[serde(rename = "redis_deleted")]
    pub primary_deleted: bool,
    /// Backup rows removed
    #[serde(rename = "sqlite_deleted")]
    pub secondary_deleted: u64,
    /// Set when the primary delete failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_error: Option<String>,
    /// Set when the backup delete failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_error: Option<String>,
    /// When the purge ran
    pub timestamp: String,
}

const PRIMARY_FAILED: &str = "primary store delete failed";
const SECONDARY_FAILED: &str = "backup store delete failed";

/// Deletes projects
#[derive(Debug, Clone)]
pub struct PurgeCoordinator {
    stores: StoreContext,
}

impl PurgeCoordinator {
    /// Create a coordinator over the given stores
    pub fn new(stores: StoreContext) -> Self {
        Self { stores }
    }

    /// Delete every record of a project
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidProject`] for a bad identifier
    /// - [`Error::ConfirmationRequired`] unless `confirm` is set; nothing is deleted
    /// - [`Error::Purge`] if both deletes fail
    pub fn purge(&self, project: &str, confirm: bool) -> Result<PurgeReport> {
        let project = ProjectId::parse(project)?;
        if !confirm {
            return Err(Error::ConfirmationRequired);
        }

        let primary = self.stores.primary().delete(&project.stream_key());
        let secondary = self.stores.backup().delete_project(project.as_str());

        let report = match (primary, secondary) {
            (Ok(primary_deleted), Ok(secondary_deleted)) => PurgeReport {
                status: PurgeStatus::Success,
                project,
                primary_deleted,
                secondary_deleted,
                primary_error: None,
                secondary_error: None,
                timestamp: codec::timestamp_now(),
            },
            (Err(e), Ok(secondary_deleted)) => {
                warn!(project = %project, error = %e, "primary delete failed during purge");
                PurgeReport {
                    status: PurgeStatus::Partial,
                    project,
                    primary_deleted: false,
                    secondary_deleted,
                    primary_error: Some(PRIMARY_FAILED.to_string()),
                    secondary_error: None,
                    timestamp: codec::timestamp_now(),
                }
            }
            (Ok(primary_deleted), Err(e)) => {
                warn!(project = %project, error = %e, "backup delete failed during purge");
                PurgeReport {
                    status: PurgeStatus::Partial,
                    project,
                    primary_deleted,
                    secondary_deleted: 0,
                    primary_error: None,
                    secondary_error: Some(SECONDARY_FAILED.to_string()),
                    timestamp: codec::timestamp_now(),
                }
            }
            (Err(p), Err(s)) => {
                error!(project = %project, primary = %p, backup = %s, "purge failed on both stores");
                return Err(Error::Purge(format!("primary: {}; backup: {}", p, s)));
            }
        };

        info!(
            project = %report.project,
            status = ?report.status,
            primary_deleted = report.primary_deleted,
            secondary_deleted = report.secondary_deleted,
            "project purged"
        );
        Ok(report)
    }
}
