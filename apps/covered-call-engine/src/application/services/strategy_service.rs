//! Strategy Service
//!
//! Composes the premium estimator and expiry scheduler with the current
//! price, stored settings and the call ledger.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::application::dto::{PricePoint, PriceRow, StrategyStatusDto};
use crate::application::ports::{
    CallRepository, Clock, PriceHistoryRepository, PriceSource, PriceSourceError,
    SettingsRepository, StoreError,
};
use crate::domain::market::latest_close;
use crate::domain::pricing::{PremiumEstimator, PricingError};
use crate::domain::strategy::{
    CallPosition, CoveredCallQuote, NewCallPosition, SettingsError, SettingsUpdate,
    StrategySettings, annualized_return, quote_covered_call,
};
use crate::observability;

/// Default number of daily bars pulled by a refresh.
pub const DEFAULT_REFRESH_DAYS: usize = 365;

/// Default number of daily bars returned by price history.
pub const DEFAULT_HISTORY_DAYS: usize = 90;

/// Errors from strategy operations.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// Pricing inputs were rejected.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Settings update was rejected.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// No current price could be obtained.
    #[error("No price available for the underlying: {message}")]
    PriceUnavailable {
        /// Error details.
        message: String,
    },

    /// No call with the given id.
    #[error("Call not found: {id}")]
    CallNotFound {
        /// The requested id.
        id: i64,
    },

    /// Storage failure.
    #[error("Storage error: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for StrategyError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => Self::CallNotFound { id },
            other => Self::Storage(other),
        }
    }
}

impl From<PriceSourceError> for StrategyError {
    fn from(err: PriceSourceError) -> Self {
        Self::PriceUnavailable {
            message: err.to_string(),
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone, Copy)]
pub struct StrategyServiceConfig {
    /// Settings used until the first save.
    pub default_settings: StrategySettings,
    /// Number of recent closes included in the status snapshot.
    pub recent_prices_window: usize,
}

impl Default for StrategyServiceConfig {
    fn default() -> Self {
        Self {
            default_settings: StrategySettings::default(),
            recent_prices_window: 30,
        }
    }
}

/// Covered-call strategy orchestrator.
pub struct StrategyService<P, H, C, S>
where
    P: PriceSource,
    H: PriceHistoryRepository,
    C: CallRepository,
    S: SettingsRepository,
{
    price_source: Arc<P>,
    history: Arc<H>,
    calls: Arc<C>,
    settings: Arc<S>,
    clock: Arc<dyn Clock>,
    estimator: PremiumEstimator,
    config: StrategyServiceConfig,
    /// Held across load, merge and save of a settings update.
    settings_write: Mutex<()>,
}

impl<P, H, C, S> StrategyService<P, H, C, S>
where
    P: PriceSource,
    H: PriceHistoryRepository,
    C: CallRepository,
    S: SettingsRepository,
{
    /// Create a new StrategyService.
    pub fn new(
        price_source: Arc<P>,
        history: Arc<H>,
        calls: Arc<C>,
        settings: Arc<S>,
        clock: Arc<dyn Clock>,
        estimator: PremiumEstimator,
        config: StrategyServiceConfig,
    ) -> Self {
        Self {
            price_source,
            history,
            calls,
            settings,
            clock,
            estimator,
            config,
            settings_write: Mutex::new(()),
        }
    }

    /// Stored settings, or the configured defaults before the first save.
    pub async fn settings(&self) -> Result<StrategySettings, StrategyError> {
        Ok(self
            .settings
            .load()
            .await?
            .unwrap_or(self.config.default_settings))
    }

    /// Latest close of the underlying.
    pub async fn current_price(&self) -> Result<f64, StrategyError> {
        let bars = self.price_source.latest(1).await?;
        latest_close(&bars).ok_or_else(|| StrategyError::PriceUnavailable {
            message: "price source returned no bars".to_string(),
        })
    }

    /// Quote the next call for the current price and settings.
    async fn quote(&self) -> Result<(f64, StrategySettings, CoveredCallQuote), StrategyError> {
        let current_price = self.current_price().await?;
        let settings = self.settings().await?;
        let quote = quote_covered_call(
            &self.estimator,
            current_price,
            &settings,
            self.clock.today(),
        )?;

        observability::record_premium_estimate(quote.days_to_expiry);
        tracing::debug!(
            current_price,
            strike_price = quote.strike_price,
            premium = quote.estimated_premium,
            days_to_expiry = quote.days_to_expiry,
            "Quoted covered call"
        );

        Ok((current_price, settings, quote))
    }

    /// Current strategy snapshot.
    pub async fn status(&self) -> Result<StrategyStatusDto, StrategyError> {
        let (current_price, settings, quote) = self.quote().await?;

        let recent_prices = self
            .history
            .recent(self.config.recent_prices_window)
            .await?
            .iter()
            .map(PricePoint::from)
            .collect();

        let total_income = self.calls.total_closed_income().await?;
        let annualized =
            annualized_return(total_income, current_price, settings.shares_owned);

        Ok(StrategyStatusDto::new(
            current_price,
            &settings,
            &quote,
            recent_prices,
            total_income,
            annualized,
        ))
    }

    /// Write a new call at the current quote and record it.
    pub async fn open_call(&self) -> Result<CallPosition, StrategyError> {
        let (current_price, settings, quote) = self.quote().await?;

        let call = self
            .calls
            .insert(NewCallPosition {
                strike_price: quote.strike_price,
                current_price,
                premium: quote.estimated_premium,
                premium_pct: settings.premium_pct,
                shares: settings.shares_owned,
                income: quote.estimated_income,
                expires: quote.next_expiry,
                created_at: self.clock.now(),
            })
            .await?;

        observability::record_call_opened();
        tracing::info!(
            call_id = call.id,
            strike_price = call.strike_price,
            premium = call.premium,
            expires = %call.expires,
            "Covered call recorded"
        );

        Ok(call)
    }

    /// All recorded calls, newest first.
    pub async fn list_calls(&self) -> Result<Vec<CallPosition>, StrategyError> {
        Ok(self.calls.list().await?)
    }

    /// Close a recorded call.
    pub async fn close_call(&self, id: i64) -> Result<(), StrategyError> {
        self.calls.close(id).await?;
        observability::record_call_closed();
        tracing::info!(call_id = id, "Covered call closed");
        Ok(())
    }

    /// Merge and persist a settings change.
    pub async fn update_settings(
        &self,
        update: SettingsUpdate,
    ) -> Result<StrategySettings, StrategyError> {
        let _guard = self.settings_write.lock().await;
        let merged = self.settings().await?.merge(&update)?;
        self.settings.save(&merged).await?;

        tracing::info!(
            shares_owned = merged.shares_owned,
            premium_pct = merged.premium_pct,
            "Strategy settings updated"
        );

        Ok(merged)
    }

    /// Pull up to `days` bars from the price source.
    ///
    /// Returns the number of bars obtained.
    pub async fn refresh_prices(&self, days: usize) -> Result<usize, StrategyError> {
        let bars = self.price_source.latest(days).await?;
        tracing::info!(requested = days, received = bars.len(), "Price history refreshed");
        Ok(bars.len())
    }

    /// Up to `days` cached bars, oldest first.
    pub async fn price_history(&self, days: usize) -> Result<Vec<PriceRow>, StrategyError> {
        Ok(self
            .history
            .recent(days)
            .await?
            .iter()
            .map(PriceRow::from)
            .collect())
    }
}
