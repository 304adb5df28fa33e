//! Strategy settings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from settings validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// Share count must be a positive integer.
    #[error("shares_owned must be greater than zero")]
    NoShares,

    /// Strike offset must be a finite percentage above -100.
    #[error("premium_pct must be a finite percentage greater than -100, got {0}")]
    InvalidPremiumPct(String),
}

/// Position size and strike offset for the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategySettings {
    /// Shares of the underlying held, one contract per 100.
    pub shares_owned: u32,
    /// Strike offset above spot, in percent (3.0 = 3% OTM).
    pub premium_pct: f64,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            shares_owned: 100,
            premium_pct: 3.0,
        }
    }
}

impl StrategySettings {
    /// Create validated settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `shares_owned` is zero or `premium_pct` is not usable.
    pub fn new(shares_owned: u32, premium_pct: f64) -> Result<Self, SettingsError> {
        let settings = Self {
            shares_owned,
            premium_pct,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Check invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.shares_owned == 0 {
            return Err(SettingsError::NoShares);
        }
        if !self.premium_pct.is_finite() || self.premium_pct <= -100.0 {
            return Err(SettingsError::InvalidPremiumPct(self.premium_pct.to_string()));
        }
        Ok(())
    }

    /// Apply a partial update, validating the merged result.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged settings are invalid; `self` is unchanged.
    pub fn merge(&self, update: &SettingsUpdate) -> Result<Self, SettingsError> {
        let merged = Self {
            shares_owned: update.shares_owned.unwrap_or(self.shares_owned),
            premium_pct: update.premium_pct.unwrap_or(self.premium_pct),
        };
        merged.validate()?;
        Ok(merged)
    }
}

/// Partial settings change; absent fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    /// New share count.
    #[serde(default)]
    pub shares_owned: Option<u32>,
    /// New strike offset percentage.
    #[serde(default)]
    pub premium_pct: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_one_contract_three_percent() {
        let settings = StrategySettings::default();
        assert_eq!(settings.shares_owned, 100);
        assert_eq!(settings.premium_pct, 3.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn rejects_zero_shares() {
        assert_eq!(StrategySettings::new(0, 3.0), Err(SettingsError::NoShares));
    }

    #[test]
    fn rejects_unusable_premium_pct() {
        assert!(StrategySettings::new(100, f64::NAN).is_err());
        assert!(StrategySettings::new(100, -100.0).is_err());
        assert!(StrategySettings::new(100, 0.0).is_ok());
    }

    #[test]
    fn merge_keeps_absent_fields() {
        let current = StrategySettings::new(200, 5.0).unwrap();
        let merged = current
            .merge(&SettingsUpdate {
                shares_owned: None,
                premium_pct: Some(2.5),
            })
            .unwrap();
        assert_eq!(merged.shares_owned, 200);
        assert_eq!(merged.premium_pct, 2.5);
    }

    #[test]
    fn merge_rejects_invalid_result() {
        let current = StrategySettings::default();
        let update = SettingsUpdate {
            shares_owned: Some(0),
            premium_pct: None,
        };
        assert!(current.merge(&update).is_err());
    }

    #[test]
    fn update_deserializes_camel_case() {
        let update: SettingsUpdate = serde_json::from_str(r#"{"sharesOwned": 300}"#).unwrap();
        assert_eq!(update.shares_owned, Some(300));
        assert_eq!(update.premium_pct, None);
    }
}
