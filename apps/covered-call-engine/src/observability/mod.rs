//! Observability module for metrics.
//!
//! Counters for price fetches, cache fallbacks, premium estimates and the
//! call ledger, exported in Prometheus format.

mod metrics;

pub use metrics::{
    MetricsError, init_metrics, record_call_closed, record_call_opened, record_premium_estimate,
    record_price_fallback, record_price_fetch,
};
