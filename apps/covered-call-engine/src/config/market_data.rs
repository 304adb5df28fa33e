//! Market data provider configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::infrastructure::market_data::{AlphaVantageConfig, DEFAULT_BASE_URL};

/// Alpha Vantage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketDataConfig {
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: default_api_key(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl MarketDataConfig {
    /// Client configuration for `symbol`.
    #[must_use]
    pub fn client_config(&self, symbol: &str) -> AlphaVantageConfig {
        AlphaVantageConfig::new(self.api_key.clone(), symbol)
            .with_base_url(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_key() -> String {
    "demo".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}
