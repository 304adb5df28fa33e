//! Repository Ports (Driven Ports)
//!
//! Storage interfaces for cached prices, the call ledger and strategy settings.

use async_trait::async_trait;

use crate::domain::market::PriceBar;
use crate::domain::strategy::{CallPosition, NewCallPosition, StrategySettings};

/// Storage error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Query execution error.
    #[error("Query error: {0}")]
    Query(String),

    /// A stored row could not be decoded.
    #[error("Data integrity error: {0}")]
    Integrity(String),

    /// No call with the given id.
    #[error("Call not found: {id}")]
    NotFound {
        /// The requested id.
        id: i64,
    },
}

/// Cached daily price history.
#[async_trait]
pub trait PriceHistoryRepository: Send + Sync {
    /// Insert bars, replacing any stored bar with the same date.
    async fn upsert_bars(&self, bars: &[PriceBar]) -> Result<(), StoreError>;

    /// The `n` most recent stored bars, oldest first.
    async fn recent(&self, n: usize) -> Result<Vec<PriceBar>, StoreError>;
}

/// Ledger of written calls.
#[async_trait]
pub trait CallRepository: Send + Sync {
    /// Record a new open call and return it with its assigned id.
    async fn insert(&self, call: NewCallPosition) -> Result<CallPosition, StoreError>;

    /// All calls, newest first.
    async fn list(&self) -> Result<Vec<CallPosition>, StoreError>;

    /// Mark a call closed.
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    async fn close(&self, id: i64) -> Result<(), StoreError>;

    /// Sum of income over closed calls; zero when there are none.
    async fn total_closed_income(&self) -> Result<f64, StoreError>;
}

/// Persisted strategy settings.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Stored settings, or `None` before the first save.
    async fn load(&self) -> Result<Option<StrategySettings>, StoreError>;

    /// Replace the stored settings.
    async fn save(&self, settings: &StrategySettings) -> Result<(), StoreError>;
}
