//! HTTP response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::strategy::StrategySettings;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Server time.
    pub timestamp: DateTime<Utc>,
    /// Service version.
    pub version: String,
}

/// Acknowledgement with no payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Always true.
    pub success: bool,
}

/// Settings after an update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    /// Always true.
    pub success: bool,
    /// Stored share count.
    pub shares_owned: u32,
    /// Stored strike offset in percent.
    pub premium_pct: f64,
}

impl From<StrategySettings> for SettingsResponse {
    fn from(settings: StrategySettings) -> Self {
        Self {
            success: true,
            shares_owned: settings.shares_owned,
            premium_pct: settings.premium_pct,
        }
    }
}

/// Result of a price refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// Number of bars obtained.
    pub count: usize,
}
