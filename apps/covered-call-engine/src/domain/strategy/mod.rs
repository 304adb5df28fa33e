//! Covered-call strategy model.
//!
//! Settings, the call position ledger entry, and the pure projection that
//! turns a spot price into a strike, premium and income estimate.

mod position;
mod projection;
mod settings;

pub use position::{CallPosition, CallStatus, NewCallPosition};
pub use projection::{
    CoveredCallQuote, annualized_return, estimated_income, quote_covered_call, strike_price,
};
pub use settings::{SettingsError, SettingsUpdate, StrategySettings};
