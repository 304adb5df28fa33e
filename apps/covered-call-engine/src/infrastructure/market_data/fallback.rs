//! Remote price source with a local cache fallback.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{PriceHistoryRepository, PriceSource, PriceSourceError};
use crate::domain::market::PriceBar;
use crate::observability;

/// Fetches from a remote source, caching every successful response.
///
/// When the remote fails the most recent cached bars are served instead.
pub struct FallbackPriceSource<R, H>
where
    R: PriceSource,
    H: PriceHistoryRepository,
{
    remote: R,
    cache: Arc<H>,
}

impl<R, H> FallbackPriceSource<R, H>
where
    R: PriceSource,
    H: PriceHistoryRepository,
{
    /// Create a new fallback source.
    pub const fn new(remote: R, cache: Arc<H>) -> Self {
        Self { remote, cache }
    }
}

#[async_trait]
impl<R, H> PriceSource for FallbackPriceSource<R, H>
where
    R: PriceSource,
    H: PriceHistoryRepository,
{
    async fn latest(&self, n: usize) -> Result<Vec<PriceBar>, PriceSourceError> {
        match self.remote.latest(n).await {
            Ok(bars) => {
                observability::record_price_fetch("success");
                if let Err(e) = self.cache.upsert_bars(&bars).await {
                    tracing::warn!(error = %e, bars = bars.len(), "Failed to cache price bars");
                }
                Ok(bars)
            }
            Err(remote_err) => {
                observability::record_price_fetch("failure");
                observability::record_price_fallback();
                tracing::warn!(error = %remote_err, "Price fetch failed, serving cached bars");

                self.cache
                    .recent(n)
                    .await
                    .map_err(|e| PriceSourceError::Unavailable {
                        message: format!("{remote_err}; cache: {e}"),
                    })
            }
        }
    }
}
