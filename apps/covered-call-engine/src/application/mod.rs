//! Application layer.
//!
//! Ports describe the collaborators the strategy needs (price history,
//! storage, a clock); services compose them with the domain.

pub mod dto;
pub mod ports;
pub mod services;
