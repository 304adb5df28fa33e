//! Market data value types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of price history for the underlying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date.
    pub date: NaiveDate,
    /// Closing price.
    pub close: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Shares traded.
    pub volume: u64,
}

impl PriceBar {
    /// Create a new bar.
    #[must_use]
    pub const fn new(date: NaiveDate, close: f64, high: f64, low: f64, volume: u64) -> Self {
        Self {
            date,
            close,
            high,
            low,
            volume,
        }
    }
}

/// Close of the most recent bar in a chronological series.
#[must_use]
pub fn latest_close(bars: &[PriceBar]) -> Option<f64> {
    bars.last().map(|bar| bar.close)
}

/// Keep only the `n` most recent bars, sorted ascending by date.
///
/// Bars sharing a date keep the one that appeared last in the input.
#[must_use]
pub fn most_recent(mut bars: Vec<PriceBar>, n: usize) -> Vec<PriceBar> {
    bars.reverse();
    bars.sort_by_key(|bar| std::cmp::Reverse(bar.date));
    bars.dedup_by_key(|bar| bar.date);
    bars.truncate(n);
    bars.reverse();
    bars
}
