//! Caching layer for isochrone responses.
//!
//! Budget search probes the same traveler at several budgets, and re-plans
//! after a traveler moves re-request everyone else. Responses are keyed by
//! the exact position, budget and mode, so a cached answer is always the
//! answer the provider gave for that request.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::{Position, Region, TransportMode};
use crate::engine::IsochroneProvider;
use crate::providers::ProviderError;

/// Cache key: (lng bits, lat bits, budget minutes, mode).
type IsochroneKey = (u64, u64, u32, TransportMode);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(15 * 60),
            max_capacity: 2000,
        }
    }
}

/// Isochrone provider with caching.
///
/// Successful answers are cached, including "no polygon". Errors are not,
/// so a transient failure is retried on the next request.
pub struct CachedIsochroneProvider<P> {
    inner: P,
    cache: MokaCache<IsochroneKey, Option<Region>>,
}

impl<P: IsochroneProvider> CachedIsochroneProvider<P> {
    /// Create a new cached provider.
    pub fn new(inner: P, config: &CacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, cache }
    }

    fn key(position: Position, budget_minutes: u32, mode: TransportMode) -> IsochroneKey {
        let (lng, lat) = position.bits();
        (lng, lat, budget_minutes, mode)
    }

    /// Access the underlying provider for requests that bypass the cache.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }
}

impl<P: IsochroneProvider> IsochroneProvider for CachedIsochroneProvider<P> {
    async fn fetch_isochrone(
        &self,
        position: Position,
        budget_minutes: u32,
        mode: TransportMode,
    ) -> Result<Option<Region>, ProviderError> {
        let key = Self::key(position, budget_minutes, mode);

        if let Some(cached) = self.cache.get(&key).await {
            debug!(%position, budget_minutes, %mode, "Isochrone cache hit");
            return Ok(cached);
        }

        let fetched = self
            .inner
            .fetch_isochrone(position, budget_minutes, mode)
            .await?;

        self.cache.insert(key, fetched.clone()).await;

        Ok(fetched)
    }
}
