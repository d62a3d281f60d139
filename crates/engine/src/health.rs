//! Store liveness report

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::context::StoreContext;

/// Overall service health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Both stores answer
    Healthy,
    /// One store answers
    Degraded,
    /// Neither store answers
    Unhealthy,
}

/// State of one store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreHealth {
    /// Ping succeeded
    Connected,
    /// Ping failed
    Disconnected,
}

impl StoreHealth {
    fn is_connected(self) -> bool {
        self == StoreHealth::Connected
    }
}

/// Health of the service and each store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Overall status
    pub status: HealthStatus,
    /// Stream store
    #[serde(rename = "redis")]
    pub primary: StoreHealth,
    /// SQLite mirror
    #[serde(rename = "sqlite")]
    pub backup: StoreHealth,
}

/// Ping both stores
pub fn check(stores: &StoreContext) -> HealthReport {
    let primary = match stores.primary().ping() {
        Ok(()) => StoreHealth::Connected,
        Err(e) => {
            warn!(error = %e, "primary store ping failed");
            StoreHealth::Disconnected
        }
    };
    let backup = match stores.backup().ping() {
        Ok(()) => StoreHealth::Connected,
        Err(e) => {
            warn!(error = %e, "backup store ping failed");
            StoreHealth::Disconnected
        }
    };
    let status = match (primary.is_connected(), backup.is_connected()) {
        (true, true) => HealthStatus::Healthy,
        (false, false) => HealthStatus::Unhealthy,
        _ => HealthStatus::Degraded,
    };
    HealthReport {
        status,
        primary,
        backup,
    }
}
