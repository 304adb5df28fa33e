//! Data transfer objects for API boundaries.

mod strategy_dto;

pub use strategy_dto::{PricePoint, PriceRow, StrategyStatusDto};
