//! Infrastructure layer - adapters for the application ports.

pub mod http;
pub mod market_data;
pub mod persistence;
