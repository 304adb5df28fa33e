//! Strike, premium and income projection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::settings::StrategySettings;
use crate::domain::expiry::{days_to_expiry, next_monthly_expiry};
use crate::domain::pricing::{PremiumEstimator, PricingError};

/// Months per year, used to scale realized monthly income.
const MONTHS_PER_YEAR: f64 = 12.0;

/// Projected terms of the next covered call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoveredCallQuote {
    /// Strike at the configured offset above spot.
    pub strike_price: f64,
    /// Theoretical premium per share.
    pub estimated_premium: f64,
    /// Premium across all shares owned.
    pub estimated_income: f64,
    /// Calendar days until `next_expiry`.
    pub days_to_expiry: u32,
    /// Next monthly expiration.
    pub next_expiry: NaiveDate,
}

/// Strike at `premium_pct` percent above the current price.
#[must_use]
pub fn strike_price(current_price: f64, premium_pct: f64) -> f64 {
    current_price * (1.0 + premium_pct / 100.0)
}

/// Premium income across all shares.
#[must_use]
pub fn estimated_income(premium: f64, shares_owned: u32) -> f64 {
    premium * f64::from(shares_owned)
}

/// Realized income scaled to a year.
///
/// Treats the realized total as one month of income and multiplies by
/// twelve. Returns 0 when the position value is zero.
#[must_use]
pub fn annualized_return(total_closed_income: f64, current_price: f64, shares_owned: u32) -> f64 {
    let position_value = current_price * f64::from(shares_owned);
    if position_value == 0.0 {
        return 0.0;
    }
    total_closed_income / position_value * MONTHS_PER_YEAR
}

/// Quote the next monthly covered call written against the position.
///
/// # Errors
///
/// Returns [`PricingError::InvalidInput`] if the current price is not positive.
pub fn quote_covered_call(
    estimator: &PremiumEstimator,
    current_price: f64,
    settings: &StrategySettings,
    today: NaiveDate,
) -> Result<CoveredCallQuote, PricingError> {
    let next_expiry = next_monthly_expiry(today);
    let days = days_to_expiry(next_expiry, today);
    let strike = strike_price(current_price, settings.premium_pct);

    let premium = estimator.estimate(current_price, strike, days)?;

    Ok(CoveredCallQuote {
        strike_price: strike,
        estimated_premium: premium,
        estimated_income: estimated_income(premium, settings.shares_owned),
        days_to_expiry: days,
        next_expiry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan_10() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    #[test]
    fn strike_is_offset_above_spot() {
        assert!((strike_price(22.5, 3.0) - 23.175).abs() < 1e-12);
        assert_eq!(strike_price(22.5, 0.0), 22.5);
    }

    #[test]
    fn income_scales_with_shares() {
        assert_eq!(estimated_income(0.5, 300), 150.0);
    }

    #[test]
    fn annualized_return_multiplies_by_twelve() {
        // 50 realized on a 2,250 position
        let annual = annualized_return(50.0, 22.5, 100);
        assert!((annual - 50.0 / 2250.0 * 12.0).abs() < 1e-12);
    }

    #[test]
    fn annualized_return_of_zero_position_is_zero() {
        assert_eq!(annualized_return(50.0, 0.0, 100), 0.0);
    }

    #[test]
    fn quote_uses_next_expiry_and_offset() {
        let quote = quote_covered_call(
            &PremiumEstimator::default(),
            22.5,
            &StrategySettings::default(),
            jan_10(),
        )
        .unwrap();

        assert_eq!(quote.next_expiry, NaiveDate::from_ymd_opt(2024, 2, 16).unwrap());
        assert_eq!(quote.days_to_expiry, 37);
        assert!((quote.strike_price - 23.175).abs() < 1e-12);
        assert!((quote.estimated_premium - 0.617_092_254_256_306_2).abs() < 1e-12);
        assert!((quote.estimated_income - quote.estimated_premium * 100.0).abs() < 1e-12);
    }

    #[test]
    fn quote_rejects_missing_price() {
        let result = quote_covered_call(
            &PremiumEstimator::default(),
            0.0,
            &StrategySettings::default(),
            jan_10(),
        );
        assert!(matches!(result, Err(PricingError::InvalidInput { field: "spot", .. })));
    }
}
