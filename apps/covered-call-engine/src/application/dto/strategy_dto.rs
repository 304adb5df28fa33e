//! Strategy status DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::market::PriceBar;
use crate::domain::strategy::{CoveredCallQuote, StrategySettings};

/// Date and close, for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date.
    pub date: NaiveDate,
    /// Closing price.
    pub close: f64,
}

impl From<&PriceBar> for PricePoint {
    fn from(bar: &PriceBar) -> Self {
        Self {
            date: bar.date,
            close: bar.close,
        }
    }
}

/// Date, close and range of a trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    /// Trading date.
    pub date: NaiveDate,
    /// Closing price.
    pub close: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
}

impl From<&PriceBar> for PriceRow {
    fn from(bar: &PriceBar) -> Self {
        Self {
            date: bar.date,
            close: bar.close,
            high: bar.high,
            low: bar.low,
        }
    }
}

/// Current strategy snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyStatusDto {
    /// Latest close of the underlying.
    pub current_price: f64,
    /// Strike of the next call.
    pub strike_price: f64,
    /// Premium per share of the next call.
    pub estimated_premium: f64,
    /// Strike offset in percent.
    pub premium_pct: f64,
    /// Premium across all shares.
    pub estimated_income: f64,
    /// Shares owned.
    pub shares_owned: u32,
    /// Days until the next expiry.
    pub days_to_expiry: u32,
    /// Next monthly expiry (`YYYY-MM-DD`).
    pub next_expiry: NaiveDate,
    /// Recent closes, oldest first.
    pub recent_prices: Vec<PricePoint>,
    /// Income realized from closed calls.
    pub total_income: f64,
    /// Realized income scaled to a year.
    pub annualized_return: f64,
}

impl StrategyStatusDto {
    /// Assemble a snapshot from its parts.
    #[must_use]
    pub fn new(
        current_price: f64,
        settings: &StrategySettings,
        quote: &CoveredCallQuote,
        recent_prices: Vec<PricePoint>,
        total_income: f64,
        annualized_return: f64,
    ) -> Self {
        Self {
            current_price,
            strike_price: quote.strike_price,
            estimated_premium: quote.estimated_premium,
            premium_pct: settings.premium_pct,
            estimated_income: quote.estimated_income,
            shares_owned: settings.shares_owned,
            days_to_expiry: quote.days_to_expiry,
            next_expiry: quote.next_expiry,
            recent_prices,
            total_income,
            annualized_return,
        }
    }
}
