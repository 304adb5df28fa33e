//! HTTP request DTOs.

use serde::{Deserialize, Serialize};

use crate::application::services::DEFAULT_HISTORY_DAYS;

/// Query string for the price history endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricesQuery {
    /// Number of trading days to return.
    pub days: Option<usize>,
}

impl PricesQuery {
    /// Requested days, or the default window.
    #[must_use]
    pub fn days_or_default(&self) -> usize {
        self.days.unwrap_or(DEFAULT_HISTORY_DAYS)
    }
}
