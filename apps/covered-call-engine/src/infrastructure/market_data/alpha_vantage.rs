//! Alpha Vantage daily time series client.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{PriceSource, PriceSourceError};
use crate::domain::market::{PriceBar, most_recent};

/// Default Alpha Vantage endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

/// Bars returned by `outputsize=compact`.
const COMPACT_SIZE: usize = 100;

const SERIES_KEY: &str = "Time Series (Daily)";

/// Configuration for [`AlphaVantageClient`].
#[derive(Debug, Clone)]
pub struct AlphaVantageConfig {
    /// Base URL without trailing slash.
    pub base_url: String,
    /// API key; `demo` works for a handful of symbols.
    pub api_key: String,
    /// Ticker symbol.
    pub symbol: String,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl AlphaVantageConfig {
    /// Create a new configuration against the public endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            symbol: symbol.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the `TIME_SERIES_DAILY` endpoint.
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    config: AlphaVantageConfig,
}

impl AlphaVantageClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: AlphaVantageConfig) -> Result<Self, PriceSourceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PriceSourceError::Network {
                message: e.to_string(),
            })?;

        Ok(Self { client, config })
    }

    /// Symbol this client fetches.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }
}

#[async_trait]
impl PriceSource for AlphaVantageClient {
    async fn latest(&self, n: usize) -> Result<Vec<PriceBar>, PriceSourceError> {
        let url = format!("{}/query", self.config.base_url);
        let output_size = if n <= COMPACT_SIZE { "compact" } else { "full" };

        let response = self
            .client
            .get(&url)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", self.config.symbol.as_str()),
                ("outputsize", output_size),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PriceSourceError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| PriceSourceError::Network {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(PriceSourceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bars = parse_daily_series(&body, n)?;
        tracing::debug!(
            symbol = %self.config.symbol,
            output_size,
            bars = bars.len(),
            "Fetched daily series"
        );
        Ok(bars)
    }
}

#[derive(Debug, Deserialize)]
struct DailySeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    series: Option<HashMap<String, DailyEntry>>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailyEntry {
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

/// Parse a `TIME_SERIES_DAILY` body, keeping the `n` most recent bars in
/// ascending date order.
///
/// # Errors
///
/// Returns [`PriceSourceError::InvalidResponse`] if the body has no daily
/// series or a field fails to parse.
pub fn parse_daily_series(body: &str, n: usize) -> Result<Vec<PriceBar>, PriceSourceError> {
    let response: DailySeriesResponse =
        serde_json::from_str(body).map_err(|e| invalid(format!("malformed JSON: {e}")))?;

    let Some(series) = response.series else {
        let message = response
            .error_message
            .or(response.note)
            .or(response.information)
            .unwrap_or_else(|| format!("missing \"{SERIES_KEY}\""));
        return Err(invalid(message));
    };

    let bars = series
        .iter()
        .map(|(date, entry)| entry_to_bar(date, entry))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(most_recent(bars, n))
}

fn entry_to_bar(date: &str, entry: &DailyEntry) -> Result<PriceBar, PriceSourceError> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| invalid(format!("bad date {date}: {e}")))?;

    let close = number(&entry.close, "close")?;
    if !close.is_finite() || close <= 0.0 {
        return Err(invalid(format!("non-positive close on {date}: {}", entry.close)));
    }

    Ok(PriceBar {
        date,
        close,
        high: number(&entry.high, "high")?,
        low: number(&entry.low, "low")?,
        volume: entry
            .volume
            .trim()
            .parse()
            .map_err(|e| invalid(format!("bad volume {}: {e}", entry.volume)))?,
    })
}

fn number(raw: &str, field: &str) -> Result<f64, PriceSourceError> {
    raw.trim()
        .parse()
        .map_err(|e| invalid(format!("bad {field} {raw}: {e}")))
}

fn invalid(message: String) -> PriceSourceError {
    PriceSourceError::InvalidResponse { message }
}
