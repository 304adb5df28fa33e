//! Price Source Port (Driven Port)
//!
//! Interface for obtaining daily price history of the underlying.

use async_trait::async_trait;

use crate::domain::market::PriceBar;

/// Price source error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PriceSourceError {
    /// Transport failure.
    #[error("Price source network error: {message}")]
    Network {
        /// Error details.
        message: String,
    },

    /// Provider returned a non-success status.
    #[error("Price source API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Provider response could not be interpreted.
    #[error("Invalid price source response: {message}")]
    InvalidResponse {
        /// Error details.
        message: String,
    },

    /// Neither the provider nor the cache could supply prices.
    #[error("Price data unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },
}

/// Port for reading daily bars.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Up to `n` most recent daily bars, oldest first.
    async fn latest(&self, n: usize) -> Result<Vec<PriceBar>, PriceSourceError>;
}
