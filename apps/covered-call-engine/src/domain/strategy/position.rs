//! Covered call positions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a written call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    /// Written and not yet closed.
    Open,
    /// Closed; its income counts toward realized totals.
    Closed,
}

impl CallStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    /// Parse the storage representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A call about to be recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCallPosition {
    /// Strike price.
    pub strike_price: f64,
    /// Underlying price when written.
    pub current_price: f64,
    /// Estimated premium per share.
    pub premium: f64,
    /// Strike offset used, in percent.
    pub premium_pct: f64,
    /// Shares covered.
    pub shares: u32,
    /// Premium times shares.
    pub income: f64,
    /// Expiration date.
    pub expires: NaiveDate,
    /// When the call was written.
    pub created_at: DateTime<Utc>,
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallPosition {
    /// Ledger id.
    pub id: i64,
    /// Strike price.
    pub strike_price: f64,
    /// Underlying price when written.
    pub current_price: f64,
    /// Estimated premium per share.
    pub premium: f64,
    /// Strike offset used, in percent.
    pub premium_pct: f64,
    /// Shares covered.
    pub shares: u32,
    /// Premium times shares.
    pub income: f64,
    /// Current status.
    pub status: CallStatus,
    /// Expiration date.
    pub expires: NaiveDate,
    /// When the call was written.
    pub created_at: DateTime<Utc>,
}

impl CallPosition {
    /// Build a stored position from a new one.
    #[must_use]
    pub fn from_new(id: i64, call: NewCallPosition) -> Self {
        Self {
            id,
            strike_price: call.strike_price,
            current_price: call.current_price,
            premium: call.premium,
            premium_pct: call.premium_pct,
            shares: call.shares,
            income: call.income,
            status: CallStatus::Open,
            expires: call.expires,
            created_at: call.created_at,
        }
    }

    /// Whether the call still counts as open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == CallStatus::Open
    }
}
