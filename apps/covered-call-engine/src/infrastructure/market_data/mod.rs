//! Market data adapters.
//!
//! - [`AlphaVantageClient`] - daily bars from the Alpha Vantage REST API
//! - [`FallbackPriceSource`] - caches remote bars and serves the cache on failure

mod alpha_vantage;
mod fallback;

pub use alpha_vantage::{AlphaVantageClient, AlphaVantageConfig, DEFAULT_BASE_URL, parse_daily_series};
pub use fallback::FallbackPriceSource;
