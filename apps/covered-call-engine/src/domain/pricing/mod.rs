//! Call premium estimation.
//!
//! European call pricing via Black-Scholes, using the Abramowitz-Stegun
//! rational approximation for the standard normal CDF.
//!
//! # Example
//!
//! ```
//! use covered_call_engine::domain::pricing::{PricingInput, estimate_premium};
//!
//! let input = PricingInput::new(22.50, 23.18, 30);
//! let premium = estimate_premium(&input).unwrap();
//! assert!(premium > 0.0 && premium < 22.50);
//! ```

mod normal;
mod premium;

pub use normal::norm_cdf;
pub use premium::{
    DAYS_PER_YEAR, DEFAULT_RISK_FREE_RATE, DEFAULT_VOLATILITY, PremiumEstimator, PricingError,
    PricingInput, estimate_premium,
};
