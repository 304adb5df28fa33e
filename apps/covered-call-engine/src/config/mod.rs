//! Configuration module for the covered call engine.
//!
//! Loads YAML configuration with environment variable interpolation and
//! validates the values the pricing model and HTTP server depend on.
//!
//! # Usage
//!
//! ```rust,ignore
//! use covered_call_engine::config::{Config, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! println!("HTTP port: {}", config.server.http_port);
//! ```

mod market_data;
mod observability;
mod persistence;
mod pricing;
mod server;
mod strategy;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use market_data::MarketDataConfig;
pub use observability::{LoggingConfig, MetricsConfig, ObservabilityConfig};
pub use persistence::PersistenceConfig;
pub use pricing::PricingConfig;
pub use server::ServerConfig;
pub use strategy::StrategyConfig;

/// Default config file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration compiled into the binary, used when no file is present.
pub const EMBEDDED_CONFIG: &str = include_str!("../../config.yaml");

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Pricing model configuration.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Strategy defaults.
    #[serde(default)]
    pub strategy: StrategyConfig,
    /// Market data provider configuration.
    #[serde(default)]
    pub market_data: MarketDataConfig,
    /// Persistence configuration.
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from `path` if it exists, else from [`EMBEDDED_CONFIG`].
///
/// # Errors
///
/// Returns a `ConfigError` if the chosen source cannot be read, parsed, or validated.
pub fn load_config_or_embedded(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    if Path::new(path).exists() {
        load_config(Some(path))
    } else {
        load_config_from_string(EMBEDDED_CONFIG)
    }
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map(|m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.http_port == 0 {
        return Err(ConfigError::ValidationError(
            "server.http_port must be non-zero".to_string(),
        ));
    }

    let vol = config.pricing.volatility;
    if !vol.is_finite() || vol <= 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "pricing.volatility must be positive, got {vol}"
        )));
    }

    let rate = config.pricing.risk_free_rate;
    if !(-1.0..=1.0).contains(&rate) {
        return Err(ConfigError::ValidationError(format!(
            "pricing.risk_free_rate must be between -1.0 and 1.0, got {rate}"
        )));
    }

    if config.strategy.symbol.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "strategy.symbol must not be empty".to_string(),
        ));
    }

    if config.strategy.shares_owned == 0 {
        return Err(ConfigError::ValidationError(
            "strategy.shares_owned must be greater than zero".to_string(),
        ));
    }

    if !config.strategy.premium_pct.is_finite() {
        return Err(ConfigError::ValidationError(
            "strategy.premium_pct must be finite".to_string(),
        ));
    }

    let format = config.observability.logging.format.as_str();
    if !matches!(format, "json" | "pretty") {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be json or pretty, got {format}"
        )));
    }

    Ok(())
}
