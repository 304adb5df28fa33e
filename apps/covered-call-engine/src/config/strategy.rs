//! Strategy defaults.

use serde::{Deserialize, Serialize};

use crate::application::services::StrategyServiceConfig;
use crate::domain::strategy::StrategySettings;

/// Strategy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Underlying ticker.
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Shares held until settings are first saved.
    #[serde(default = "default_shares_owned")]
    pub shares_owned: u32,
    /// Strike offset in percent until settings are first saved.
    #[serde(default = "default_premium_pct")]
    pub premium_pct: f64,
    /// Closes included in the status snapshot.
    #[serde(default = "default_recent_prices_window")]
    pub recent_prices_window: usize,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            shares_owned: default_shares_owned(),
            premium_pct: default_premium_pct(),
            recent_prices_window: default_recent_prices_window(),
        }
    }
}

impl StrategyConfig {
    /// Service configuration derived from these defaults.
    #[must_use]
    pub const fn service_config(&self) -> StrategyServiceConfig {
        StrategyServiceConfig {
            default_settings: StrategySettings {
                shares_owned: self.shares_owned,
                premium_pct: self.premium_pct,
            },
            recent_prices_window: self.recent_prices_window,
        }
    }
}

fn default_symbol() -> String {
    "SLV".to_string()
}

const fn default_shares_owned() -> u32 {
    100
}

const fn default_premium_pct() -> f64 {
    3.0
}

const fn default_recent_prices_window() -> usize {
    30
}
