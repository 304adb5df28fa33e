//! Application services.

mod strategy_service;

pub use strategy_service::{
    DEFAULT_HISTORY_DAYS, DEFAULT_REFRESH_DAYS, StrategyError, StrategyService,
    StrategyServiceConfig,
};
