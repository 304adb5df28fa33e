//! Port definitions (driven side).

mod clock;
mod price_source_port;
mod repository_port;

pub use clock::{Clock, FixedClock, SystemClock};
pub use price_source_port::{PriceSource, PriceSourceError};
pub use repository_port::{
    CallRepository, PriceHistoryRepository, SettingsRepository, StoreError,
};
