// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Covered Call Engine - Rust Core Library
//!
//! Estimates option-premium income for a covered-call strategy on a single
//! equity (SLV by default).
//!
//! # Architecture
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure computations with no I/O
//!   - `pricing`: Black-Scholes call premium with a rational normal-CDF approximation
//!   - `expiry`: Third-Friday-of-next-month expiration scheduling
//!   - `strategy`: Settings, call positions, strike/income projection
//!   - `market`: Daily price bars
//!
//! - **Application**: Orchestration
//!   - `ports`: `PriceSource`, `PriceHistoryRepository`, `CallRepository`, `SettingsRepository`, `Clock`
//!   - `services`: `StrategyService`
//!   - `dto`: API-facing snapshots
//!
//! - **Infrastructure**: Adapters
//!   - `market_data`: Alpha Vantage client, cache-fallback price source
//!   - `persistence`: Turso store, in-memory store
//!   - `http`: Axum router

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Domain layer - Pricing, expiry scheduling and strategy math.
pub mod domain;

/// Application layer - Ports and the strategy service.
pub mod application;

/// Infrastructure layer - Market data, persistence and HTTP adapters.
pub mod infrastructure;

/// Configuration loading and validation.
pub mod config;

/// API error types.
pub mod error;

/// Prometheus metrics.
pub mod observability;

/// Tracing subscriber setup.
pub mod telemetry;

// Domain re-exports
pub use domain::expiry::{days_to_expiry, next_monthly_expiry, third_friday};
pub use domain::pricing::{PremiumEstimator, PricingError, PricingInput, estimate_premium};
pub use domain::strategy::{CallPosition, CallStatus, StrategySettings};

// Application re-exports
pub use application::ports::{
    CallRepository, Clock, PriceHistoryRepository, PriceSource, SettingsRepository, SystemClock,
};
pub use application::services::{StrategyError, StrategyService};

// Infrastructure re-exports
pub use infrastructure::http::{AppState, create_router};
pub use infrastructure::market_data::{AlphaVantageClient, FallbackPriceSource};
pub use infrastructure::persistence::{InMemoryStore, TursoStore};
