//! Premium model parameters.

use serde::{Deserialize, Serialize};

use crate::domain::pricing::{DEFAULT_RISK_FREE_RATE, DEFAULT_VOLATILITY, PremiumEstimator};

/// Pricing model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Annualized volatility assumed for the underlying.
    #[serde(default = "default_volatility")]
    pub volatility: f64,
    /// Risk-free rate (annualized).
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            volatility: default_volatility(),
            risk_free_rate: default_risk_free_rate(),
        }
    }
}

impl PricingConfig {
    /// Build the estimator these parameters describe.
    #[must_use]
    pub const fn estimator(&self) -> PremiumEstimator {
        PremiumEstimator::new(self.volatility, self.risk_free_rate)
    }
}

const fn default_volatility() -> f64 {
    DEFAULT_VOLATILITY
}

const fn default_risk_free_rate() -> f64 {
    DEFAULT_RISK_FREE_RATE
}
