//! Prometheus metrics for the covered call engine.
//!
//! # Example
//!
//! ```ignore
//! use covered_call_engine::observability::{init_metrics, record_price_fetch};
//!
//! init_metrics("0.0.0.0:9464".parse()?)?;
//! record_price_fetch("success");
//! ```

use std::net::SocketAddr;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Buckets for days-to-expiry, covering one to two monthly cycles.
const DAYS_TO_EXPIRY_BUCKETS: &[f64] = &[7.0, 14.0, 21.0, 28.0, 35.0, 42.0, 49.0, 56.0];

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(listen_addr: SocketAddr) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(listen_addr)
        .set_buckets(DAYS_TO_EXPIRY_BUCKETS)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(addr = %listen_addr, "Prometheus metrics exporter started");

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

// ============================================================================
// Market Data Metrics
// ============================================================================

/// Record a remote price fetch.
///
/// # Arguments
///
/// * `outcome` - `"success"` or `"failure"`
pub fn record_price_fetch(outcome: &'static str) {
    counter!("price_fetches_total", "outcome" => outcome).increment(1);
}

/// Record that cached bars were served in place of the remote source.
pub fn record_price_fallback() {
    counter!("price_cache_fallbacks_total").increment(1);
}

// ============================================================================
// Strategy Metrics
// ============================================================================

/// Record a premium estimate for a call expiring in `days_to_expiry` days.
pub fn record_premium_estimate(days_to_expiry: u32) {
    counter!("premium_estimates_total").increment(1);
    histogram!("premium_days_to_expiry").record(f64::from(days_to_expiry));
}

/// Record a newly written call.
pub fn record_call_opened() {
    counter!("calls_opened_total").increment(1);
}

/// Record a closed call.
pub fn record_call_closed() {
    counter!("calls_closed_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets_are_sorted() {
        assert!(DAYS_TO_EXPIRY_BUCKETS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_record_without_recorder() {
        // Without an installed recorder these are no-ops
        record_price_fetch("success");
        record_price_fallback();
        record_premium_estimate(37);
        record_call_opened();
        record_call_closed();
    }
}
