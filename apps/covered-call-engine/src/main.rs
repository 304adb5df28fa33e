//! Covered Call Engine Binary
//!
//! Serves the covered-call JSON API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin covered-call-engine
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG_PATH`: YAML config file (default: config.yaml, falls back to the built-in config)
//! - `ALPHA_VANTAGE_KEY`: Alpha Vantage API key (default: demo)
//! - `PORT`: HTTP server port (default: 3002)
//! - `DB_PATH`: Database file (default: slv_calls.db)
//! - `RUST_LOG`: Log filter, overrides the configured level

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use covered_call_engine::application::ports::SystemClock;
use covered_call_engine::application::services::StrategyService;
use covered_call_engine::config::{Config, load_config_or_embedded};
use covered_call_engine::infrastructure::http::{AppState, create_router};
use covered_call_engine::infrastructure::market_data::{AlphaVantageClient, FallbackPriceSource};
use covered_call_engine::infrastructure::persistence::TursoStore;
use covered_call_engine::observability::init_metrics;
use covered_call_engine::telemetry::init_tracing;
use tokio::net::TcpListener;
use tokio::signal;

/// Concrete price source: Alpha Vantage with the Turso cache behind it.
type LivePriceSource = FallbackPriceSource<AlphaVantageClient, TursoStore>;

/// Concrete strategy service.
type LiveStrategyService = StrategyService<LivePriceSource, TursoStore, TursoStore, TursoStore>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config_path = std::env::var("CONFIG_PATH").ok();
    let config =
        load_config_or_embedded(config_path.as_deref()).context("failed to load configuration")?;

    init_tracing(&config.observability.logging)?;

    tracing::info!(
        symbol = %config.strategy.symbol,
        volatility = config.pricing.volatility,
        risk_free_rate = config.pricing.risk_free_rate,
        db_path = %config.persistence.db_path,
        "Starting Covered Call Engine"
    );

    if config.observability.metrics.enabled {
        let addr: SocketAddr = config
            .observability
            .metrics
            .listen_addr
            .parse()
            .context("invalid metrics listen address")?;
        init_metrics(addr)?;
    }

    let strategy = create_strategy_service(&config).await?;
    serve(&config, strategy).await?;

    tracing::info!("Covered Call Engine stopped");
    Ok(())
}

/// Wire the store, price source and service together.
async fn create_strategy_service(config: &Config) -> anyhow::Result<Arc<LiveStrategyService>> {
    let store = Arc::new(
        TursoStore::open(&config.persistence.db_path)
            .await
            .with_context(|| format!("failed to open database '{}'", config.persistence.db_path))?,
    );

    if config.market_data.api_key == "demo" {
        tracing::warn!("Using the Alpha Vantage demo key; set ALPHA_VANTAGE_KEY for live data");
    }

    let client = AlphaVantageClient::new(config.market_data.client_config(&config.strategy.symbol))?;
    let price_source = Arc::new(FallbackPriceSource::new(client, Arc::clone(&store)));

    Ok(Arc::new(StrategyService::new(
        price_source,
        Arc::clone(&store),
        Arc::clone(&store),
        store,
        Arc::new(SystemClock),
        config.pricing.estimator(),
        config.strategy.service_config(),
    )))
}

/// Run the HTTP server until a shutdown signal arrives.
async fn serve(config: &Config, strategy: Arc<LiveStrategyService>) -> anyhow::Result<()> {
    let app = create_router(AppState {
        strategy,
        version: env!("CARGO_PKG_VERSION").to_string(),
    });

    let http_addr = config.server.http_addr();
    let listener = TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;

    tracing::info!(%http_addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /api/health");
    tracing::info!("  GET  /api/status");
    tracing::info!("  POST /api/refresh");
    tracing::info!("  GET  /api/calls");
    tracing::info!("  POST /api/calls");
    tracing::info!("  POST /api/calls/{{id}}/close");
    tracing::info!("  POST /api/settings");
    tracing::info!("  GET  /api/prices?days=N");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
