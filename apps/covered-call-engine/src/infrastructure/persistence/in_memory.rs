//! In-memory store for testing.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;

use crate::application::ports::{
    CallRepository, PriceHistoryRepository, SettingsRepository, StoreError,
};
use crate::domain::market::PriceBar;
use crate::domain::strategy::{CallPosition, CallStatus, NewCallPosition, StrategySettings};

/// In-memory implementation of every repository port.
///
/// Suitable for testing and development. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    prices: RwLock<BTreeMap<NaiveDate, PriceBar>>,
    calls: RwLock<Vec<CallPosition>>,
    settings: RwLock<Option<StrategySettings>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.read().len()
    }

    /// Number of cached bars.
    #[must_use]
    pub fn price_count(&self) -> usize {
        self.prices.read().len()
    }
}

#[async_trait]
impl PriceHistoryRepository for InMemoryStore {
    async fn upsert_bars(&self, bars: &[PriceBar]) -> Result<(), StoreError> {
        let mut prices = self.prices.write();
        for bar in bars {
            prices.insert(bar.date, bar.clone());
        }
        Ok(())
    }

    async fn recent(&self, n: usize) -> Result<Vec<PriceBar>, StoreError> {
        let prices = self.prices.read();
        let mut bars: Vec<PriceBar> = prices.values().rev().take(n).cloned().collect();
        bars.reverse();
        Ok(bars)
    }
}

#[async_trait]
impl CallRepository for InMemoryStore {
    async fn insert(&self, call: NewCallPosition) -> Result<CallPosition, StoreError> {
        let mut calls = self.calls.write();
        let id = calls.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let stored = CallPosition::from_new(id, call);
        calls.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<CallPosition>, StoreError> {
        let mut calls = self.calls.read().clone();
        calls.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(calls)
    }

    async fn close(&self, id: i64) -> Result<(), StoreError> {
        let mut calls = self.calls.write();
        let call = calls
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound { id })?;
        call.status = CallStatus::Closed;
        Ok(())
    }

    async fn total_closed_income(&self) -> Result<f64, StoreError> {
        Ok(self
            .calls
            .read()
            .iter()
            .filter(|c| c.status == CallStatus::Closed)
            .map(|c| c.income)
            .sum())
    }
}

#[async_trait]
impl SettingsRepository for InMemoryStore {
    async fn load(&self) -> Result<Option<StrategySettings>, StoreError> {
        Ok(*self.settings.read())
    }

    async fn save(&self, settings: &StrategySettings) -> Result<(), StoreError> {
        *self.settings.write() = Some(*settings);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn new_call(minutes: i64, income: f64) -> NewCallPosition {
        NewCallPosition {
            strike_price: 23.175,
            current_price: 22.5,
            premium: income / 100.0,
            premium_pct: 3.0,
            shares: 100,
            income,
            expires: NaiveDate::from_ymd_opt(2024, 2, 16).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 10, 15, 0, 0).unwrap()
                + Duration::minutes(minutes),
        }
    }

    fn bar(day: u32) -> PriceBar {
        PriceBar::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            20.0 + f64::from(day),
            21.0,
            19.0,
            100,
        )
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = InMemoryStore::new();
        let first = store.insert(new_call(0, 50.0)).await.unwrap();
        let second = store.insert(new_call(1, 60.0)).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.call_count(), 2);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = InMemoryStore::new();
        store.insert(new_call(0, 50.0)).await.unwrap();
        store.insert(new_call(5, 60.0)).await.unwrap();

        let calls = store.list().await.unwrap();
        assert_eq!(calls[0].id, 2);
        assert_eq!(calls[1].id, 1);
    }

    #[tokio::test]
    async fn closed_income_sums_only_closed_calls() {
        let store = InMemoryStore::new();
        let a = store.insert(new_call(0, 50.0)).await.unwrap();
        store.insert(new_call(1, 60.0)).await.unwrap();
        assert_eq!(store.total_closed_income().await.unwrap(), 0.0);

        store.close(a.id).await.unwrap();
        assert_eq!(store.total_closed_income().await.unwrap(), 50.0);
    }

    #[tokio::test]
    async fn close_unknown_id_fails() {
        let store = InMemoryStore::new();
        assert!(matches!(
            store.close(9).await,
            Err(StoreError::NotFound { id: 9 })
        ));
    }

    #[tokio::test]
    async fn recent_bars_are_latest_ascending() {
        let store = InMemoryStore::new();
        store.upsert_bars(&[bar(3), bar(1), bar(2)]).await.unwrap();
        store.upsert_bars(&[bar(2)]).await.unwrap();

        let recent = store.recent(2).await.unwrap();
        assert_eq!(store.price_count(), 3);
        assert_eq!(recent, vec![bar(2), bar(3)]);
    }

    #[tokio::test]
    async fn settings_absent_until_saved() {
        let store = InMemoryStore::new();
        assert_eq!(store.load().await.unwrap(), None);

        let settings = StrategySettings::new(200, 4.0).unwrap();
        store.save(&settings).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(settings));
    }
}
