//! Domain layer.
//!
//! Pure value types and computations. Nothing here performs I/O or holds
//! shared state, so every function is safe to call concurrently.

pub mod expiry;
pub mod market;
pub mod pricing;
pub mod strategy;
