//! Black-Scholes call premium.

// Black-Scholes uses standard mathematical notation (s, k, t, r, sigma)
#![allow(clippy::many_single_char_names)]
#![allow(clippy::suboptimal_flops)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::normal::norm_cdf;

/// Day count used to convert days to expiry into years.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Assumed annualized volatility when none is supplied.
pub const DEFAULT_VOLATILITY: f64 = 0.30;

/// Assumed annualized risk-free rate when none is supplied.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.05;

/// Errors from premium estimation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// A price or volatility input was non-positive or not finite.
    #[error("Invalid input: {field} must be positive and finite, got {value}")]
    InvalidInput {
        /// Offending field name.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Inputs to a single premium estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingInput {
    /// Current price of the underlying.
    pub spot: f64,
    /// Option strike price.
    pub strike: f64,
    /// Calendar days until expiration.
    pub days_to_expiry: u32,
    /// Annualized volatility as a fraction (0.30 = 30%).
    pub volatility: f64,
    /// Annualized risk-free rate as a fraction.
    pub risk_free_rate: f64,
}

impl PricingInput {
    /// Create an input using the default volatility and risk-free rate.
    #[must_use]
    pub const fn new(spot: f64, strike: f64, days_to_expiry: u32) -> Self {
        Self {
            spot,
            strike,
            days_to_expiry,
            volatility: DEFAULT_VOLATILITY,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }

    /// Override the volatility.
    #[must_use]
    pub const fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility;
        self
    }

    /// Override the risk-free rate.
    #[must_use]
    pub const fn with_risk_free_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = risk_free_rate;
        self
    }

    /// Time to expiry in years.
    #[must_use]
    pub fn time_to_expiry(&self) -> f64 {
        f64::from(self.days_to_expiry) / DAYS_PER_YEAR
    }

    fn validate(&self) -> Result<(), PricingError> {
        for (field, value) in [
            ("spot", self.spot),
            ("strike", self.strike),
            ("volatility", self.volatility),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PricingError::InvalidInput { field, value });
            }
        }
        Ok(())
    }
}

/// Estimate the theoretical price of a European call.
///
/// The result is never negative. At zero days to expiry the formula's
/// `sigma * sqrt(t)` denominator vanishes, so intrinsic value
/// `max(spot - strike, 0)` is returned instead.
///
/// # Errors
///
/// Returns [`PricingError::InvalidInput`] when spot, strike or volatility is
/// non-positive or not finite.
pub fn estimate_premium(input: &PricingInput) -> Result<f64, PricingError> {
    input.validate()?;

    let s = input.spot;
    let k = input.strike;
    let r = input.risk_free_rate;
    let sigma = input.volatility;
    let t = input.time_to_expiry();

    if t <= 0.0 {
        return Ok((s - k).max(0.0));
    }

    let vol_sqrt_t = sigma * t.sqrt();
    let d1 = ((s / k).ln() + (r + 0.5 * sigma.powi(2)) * t) / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;

    let call = s * norm_cdf(d1) - k * (-r * t).exp() * norm_cdf(d2);

    Ok(call.max(0.0))
}

/// Premium estimator bound to a fixed volatility and risk-free rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PremiumEstimator {
    volatility: f64,
    risk_free_rate: f64,
}

impl Default for PremiumEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_VOLATILITY, DEFAULT_RISK_FREE_RATE)
    }
}

impl PremiumEstimator {
    /// Create an estimator with the given volatility and risk-free rate.
    #[must_use]
    pub const fn new(volatility: f64, risk_free_rate: f64) -> Self {
        Self {
            volatility,
            risk_free_rate,
        }
    }

    /// Assumed volatility.
    #[must_use]
    pub const fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Assumed risk-free rate.
    #[must_use]
    pub const fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Estimate a call premium.
    ///
    /// # Errors
    ///
    /// See [`estimate_premium`].
    pub fn estimate(&self, spot: f64, strike: f64, days_to_expiry: u32) -> Result<f64, PricingError> {
        let input = PricingInput::new(spot, strike, days_to_expiry)
            .with_volatility(self.volatility)
            .with_risk_free_rate(self.risk_free_rate);
        estimate_premium(&input)
    }
}
