//! Turso-backed store.
//!
//! Persists cached prices, the call ledger and strategy settings in a local
//! SQLite-compatible database file.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use turso::{Builder, Connection, Row, Value};

use crate::application::ports::{
    CallRepository, PriceHistoryRepository, SettingsRepository, StoreError,
};
use crate::domain::market::PriceBar;
use crate::domain::strategy::{CallPosition, CallStatus, NewCallPosition, StrategySettings};

const SHARES_OWNED_KEY: &str = "shares_owned";
const PREMIUM_PCT_KEY: &str = "premium_pct";
const DATE_FORMAT: &str = "%Y-%m-%d";

const SCHEMA: [&str; 3] = [
    r"
    CREATE TABLE IF NOT EXISTS prices (
        date TEXT PRIMARY KEY,
        close REAL NOT NULL,
        high REAL NOT NULL,
        low REAL NOT NULL,
        volume INTEGER NOT NULL,
        fetched_at TEXT NOT NULL
    )",
    r"
    CREATE TABLE IF NOT EXISTS calls (
        id INTEGER PRIMARY KEY,
        strike_price REAL NOT NULL,
        current_price REAL NOT NULL,
        premium REAL NOT NULL,
        premium_pct REAL NOT NULL,
        shares INTEGER NOT NULL,
        income REAL NOT NULL,
        status TEXT NOT NULL,
        expires TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    r"
    CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )",
];

impl From<turso::Error> for StoreError {
    fn from(err: turso::Error) -> Self {
        Self::Query(err.to_string())
    }
}

/// Store backed by a Turso database.
///
/// A single connection is shared behind an async mutex so writes and the
/// id lookup that follows an insert are serialized.
pub struct TursoStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for TursoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TursoStore").finish_non_exhaustive()
    }
}

impl TursoStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let conn = db
            .connect()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        for statement in SCHEMA {
            conn.execute(statement, ()).await?;
        }

        info!(path, "Turso store opened");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::open(":memory:").await
    }

    async fn set_setting(conn: &Connection, key: &str, value: String) -> Result<(), StoreError> {
        conn.execute(
            r"
            INSERT INTO settings (key, value) VALUES (?, ?)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
            (key.to_string(), value),
        )
        .await?;
        Ok(())
    }

    async fn write_bars(conn: &Connection, bars: &[PriceBar]) -> Result<(), StoreError> {
        let fetched_at = timestamp_text(Utc::now());

        for bar in bars {
            let volume = i64::try_from(bar.volume)
                .map_err(|_| StoreError::Integrity(format!("volume out of range: {}", bar.volume)))?;

            conn.execute(
                r"
                INSERT INTO prices (date, close, high, low, volume, fetched_at)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT (date) DO UPDATE SET
                    close = EXCLUDED.close,
                    high = EXCLUDED.high,
                    low = EXCLUDED.low,
                    volume = EXCLUDED.volume,
                    fetched_at = EXCLUDED.fetched_at",
                (
                    bar.date.format(DATE_FORMAT).to_string(),
                    bar.close,
                    bar.high,
                    bar.low,
                    volume,
                    fetched_at.clone(),
                ),
            )
            .await?;
        }
        Ok(())
    }

    async fn write_settings(
        conn: &Connection,
        settings: &StrategySettings,
    ) -> Result<(), StoreError> {
        Self::set_setting(conn, SHARES_OWNED_KEY, settings.shares_owned.to_string()).await?;
        Self::set_setting(conn, PREMIUM_PCT_KEY, settings.premium_pct.to_string()).await
    }
}

#[async_trait]
impl PriceHistoryRepository for TursoStore {
    async fn upsert_bars(&self, bars: &[PriceBar]) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute("BEGIN", ()).await?;
        let written = Self::write_bars(&conn, bars).await;
        finish_transaction(&conn, written).await?;

        debug!(count = bars.len(), "Cached price bars");
        Ok(())
    }

    async fn recent(&self, n: usize) -> Result<Vec<PriceBar>, StoreError> {
        let conn = self.conn.lock().await;
        let limit = i64::try_from(n).unwrap_or(i64::MAX);
        let mut rows = conn
            .query(
                "SELECT date, close, high, low, volume FROM prices ORDER BY date DESC LIMIT ?",
                (limit,),
            )
            .await?;

        let mut bars = Vec::new();
        while let Some(row) = rows.next().await? {
            let volume = integer(&row, 4)?;
            bars.push(PriceBar {
                date: date_column(&row, 0)?,
                close: real(&row, 1)?,
                high: real(&row, 2)?,
                low: real(&row, 3)?,
                volume: u64::try_from(volume)
                    .map_err(|_| StoreError::Integrity(format!("negative volume: {volume}")))?,
            });
        }

        bars.reverse();
        Ok(bars)
    }
}

#[async_trait]
impl CallRepository for TursoStore {
    async fn insert(&self, call: NewCallPosition) -> Result<CallPosition, StoreError> {
        let conn = self.conn.lock().await;

        conn.execute(
            r"
            INSERT INTO calls (
                strike_price, current_price, premium, premium_pct, shares,
                income, status, expires, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                call.strike_price,
                call.current_price,
                call.premium,
                call.premium_pct,
                i64::from(call.shares),
                call.income,
                CallStatus::Open.as_str().to_string(),
                call.expires.format(DATE_FORMAT).to_string(),
                timestamp_text(call.created_at),
            ),
        )
        .await?;

        let mut rows = conn.query("SELECT MAX(id) FROM calls", ()).await?;
        let id = match rows.next().await? {
            Some(row) => integer(&row, 0)?,
            None => return Err(StoreError::Integrity("inserted call has no id".to_string())),
        };

        Ok(CallPosition::from_new(id, call))
    }

    async fn list(&self) -> Result<Vec<CallPosition>, StoreError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query(
                r"
                SELECT id, strike_price, current_price, premium, premium_pct, shares,
                       income, status, expires, created_at
                FROM calls
                ORDER BY created_at DESC, id DESC",
                (),
            )
            .await?;

        let mut calls = Vec::new();
        while let Some(row) = rows.next().await? {
            calls.push(row_to_call(&row)?);
        }
        Ok(calls)
    }

    async fn close(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;

        let mut rows = conn.query("SELECT id FROM calls WHERE id = ?", (id,)).await?;
        if rows.next().await?.is_none() {
            return Err(StoreError::NotFound { id });
        }
        drop(rows);

        conn.execute(
            "UPDATE calls SET status = ? WHERE id = ?",
            (CallStatus::Closed.as_str().to_string(), id),
        )
        .await?;
        Ok(())
    }

    async fn total_closed_income(&self) -> Result<f64, StoreError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query(
                "SELECT COALESCE(SUM(income), 0.0) FROM calls WHERE status = ?",
                (CallStatus::Closed.as_str().to_string(),),
            )
            .await?;

        match rows.next().await? {
            Some(row) => real(&row, 0),
            None => Ok(0.0),
        }
    }
}

#[async_trait]
impl SettingsRepository for TursoStore {
    async fn load(&self) -> Result<Option<StrategySettings>, StoreError> {
        let conn = self.conn.lock().await;
        let mut rows = conn.query("SELECT key, value FROM settings", ()).await?;

        let mut shares_owned = None;
        let mut premium_pct = None;
        while let Some(row) = rows.next().await? {
            let key = text(&row, 0)?;
            let value = text(&row, 1)?;
            match key.as_str() {
                SHARES_OWNED_KEY => {
                    shares_owned = Some(value.parse::<u32>().map_err(|e| {
                        StoreError::Integrity(format!("{SHARES_OWNED_KEY}={value}: {e}"))
                    })?);
                }
                PREMIUM_PCT_KEY => {
                    premium_pct = Some(value.parse::<f64>().map_err(|e| {
                        StoreError::Integrity(format!("{PREMIUM_PCT_KEY}={value}: {e}"))
                    })?);
                }
                _ => {}
            }
        }

        Ok(shares_owned
            .zip(premium_pct)
            .map(|(shares_owned, premium_pct)| StrategySettings {
                shares_owned,
                premium_pct,
            }))
    }

    async fn save(&self, settings: &StrategySettings) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute("BEGIN", ()).await?;
        let written = Self::write_settings(&conn, settings).await;
        finish_transaction(&conn, written).await
    }
}

/// Commit on success, roll back and return the original error otherwise.
async fn finish_transaction(
    conn: &Connection,
    result: Result<(), StoreError>,
) -> Result<(), StoreError> {
    match result {
        Ok(()) => {
            conn.execute("COMMIT", ()).await?;
            Ok(())
        }
        Err(err) => {
            if let Err(rollback) = conn.execute("ROLLBACK", ()).await {
                warn!(error = %rollback, "Rollback failed");
            }
            Err(err)
        }
    }
}

// ============================================================================
// Row Decoding
// ============================================================================

fn row_to_call(row: &Row) -> Result<CallPosition, StoreError> {
    let shares = integer(row, 5)?;
    let status = text(row, 7)?;
    let created_at = text(row, 9)?;

    Ok(CallPosition {
        id: integer(row, 0)?,
        strike_price: real(row, 1)?,
        current_price: real(row, 2)?,
        premium: real(row, 3)?,
        premium_pct: real(row, 4)?,
        shares: u32::try_from(shares)
            .map_err(|_| StoreError::Integrity(format!("shares out of range: {shares}")))?,
        income: real(row, 6)?,
        status: CallStatus::parse(&status)
            .ok_or_else(|| StoreError::Integrity(format!("unknown call status: {status}")))?,
        expires: date_column(row, 8)?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| StoreError::Integrity(format!("created_at {created_at}: {e}")))?
            .with_timezone(&Utc),
    })
}

fn timestamp_text(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn integer(row: &Row, idx: usize) -> Result<i64, StoreError> {
    match row.get_value(idx)? {
        Value::Integer(v) => Ok(v),
        other => Err(StoreError::Integrity(format!(
            "column {idx}: expected integer, got {other:?}"
        ))),
    }
}

#[allow(clippy::cast_precision_loss)]
fn real(row: &Row, idx: usize) -> Result<f64, StoreError> {
    match row.get_value(idx)? {
        Value::Real(v) => Ok(v),
        Value::Integer(v) => Ok(v as f64),
        other => Err(StoreError::Integrity(format!(
            "column {idx}: expected real, got {other:?}"
        ))),
    }
}

fn text(row: &Row, idx: usize) -> Result<String, StoreError> {
    match row.get_value(idx)? {
        Value::Text(v) => Ok(v),
        other => Err(StoreError::Integrity(format!(
            "column {idx}: expected text, got {other:?}"
        ))),
    }
}

fn date_column(row: &Row, idx: usize) -> Result<NaiveDate, StoreError> {
    let raw = text(row, idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|e| StoreError::Integrity(format!("column {idx}: bad date {raw}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

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

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            close,
            close + 0.25,
            close - 0.25,
            12_345_678,
        )
    }

    #[tokio::test]
    async fn call_ledger_round_trip() {
        let store = TursoStore::in_memory().await.unwrap();

        let first = store.insert(new_call(0, 50.0)).await.unwrap();
        let second = store.insert(new_call(10, 60.0)).await.unwrap();
        assert!(second.id > first.id);

        let calls = store.list().await.unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], second);
        assert_eq!(calls[1], first);

        assert_eq!(store.total_closed_income().await.unwrap(), 0.0);
        store.close(first.id).await.unwrap();
        assert!((store.total_closed_income().await.unwrap() - 50.0).abs() < 1e-12);

        let calls = store.list().await.unwrap();
        assert_eq!(calls[1].status, CallStatus::Closed);
    }

    #[tokio::test]
    async fn close_unknown_call_is_not_found() {
        let store = TursoStore::in_memory().await.unwrap();
        assert!(matches!(
            store.close(99).await,
            Err(StoreError::NotFound { id: 99 })
        ));
    }

    #[tokio::test]
    async fn bars_replace_by_date() {
        let store = TursoStore::in_memory().await.unwrap();
        store
            .upsert_bars(&[bar(2, 22.0), bar(3, 22.4), bar(4, 22.9)])
            .await
            .unwrap();
        store.upsert_bars(&[bar(3, 22.6)]).await.unwrap();

        let recent = store.recent(2).await.unwrap();
        assert_eq!(recent, vec![bar(3, 22.6), bar(4, 22.9)]);
        assert_eq!(store.recent(10).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn failed_batch_leaves_cache_untouched() {
        let store = TursoStore::in_memory().await.unwrap();
        store.upsert_bars(&[bar(2, 22.0), bar(3, 22.4)]).await.unwrap();

        let mut oversized = bar(4, 22.9);
        oversized.volume = u64::MAX;
        let result = store.upsert_bars(&[bar(3, 30.0), oversized]).await;

        assert!(matches!(result, Err(StoreError::Integrity(_))));
        assert_eq!(
            store.recent(10).await.unwrap(),
            vec![bar(2, 22.0), bar(3, 22.4)]
        );

        store.upsert_bars(&[bar(4, 22.9)]).await.unwrap();
        assert_eq!(store.recent(10).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn recent_accepts_unbounded_window() {
        let store = TursoStore::in_memory().await.unwrap();
        store.upsert_bars(&[bar(2, 22.0), bar(3, 22.4)]).await.unwrap();

        assert_eq!(store.recent(usize::MAX).await.unwrap().len(), 2);
        assert!(store.recent(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn settings_persist_as_key_values() {
        let store = TursoStore::in_memory().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);

        let settings = StrategySettings::new(300, 2.5).unwrap();
        store.save(&settings).await.unwrap();
        store.save(&settings).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(settings));

        let changed = StrategySettings::new(500, 5.0).unwrap();
        store.save(&changed).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(changed));
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calls.db");
        let path = path.to_str().unwrap();

        {
            let store = TursoStore::open(path).await.unwrap();
            store.insert(new_call(0, 42.0)).await.unwrap();
            store.save(&StrategySettings::default()).await.unwrap();
        }

        let store = TursoStore::open(path).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert_eq!(
            store.load().await.unwrap(),
            Some(StrategySettings::default())
        );
    }
}
