//! Process configuration read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use tracing::warn;

use crate::cache::CacheConfig;
use crate::engine::{SearchConfig, SearchStrategy};
use crate::providers::ProviderBackend;

/// Address the server binds when `MEETPOINT_BIND` is unset.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Everything `main` needs to build the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Mapbox access token (isochrones, venue search, geocoding)
    pub mapbox_token: String,

    /// OpenRouteService API key
    pub ors_token: String,

    /// Service used for isochrones
    pub isochrone_backend: ProviderBackend,

    /// Service used for venue search and geocoding
    pub geocoding_backend: ProviderBackend,

    /// Listen address
    pub bind: SocketAddr,

    /// Isochrone cache settings
    pub cache: CacheConfig,

    /// Engine tuning
    pub search: SearchConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mapbox_token: String::new(),
            ors_token: String::new(),
            isochrone_backend: ProviderBackend::default(),
            geocoding_backend: ProviderBackend::default(),
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cache: CacheConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Missing credentials and
    /// unparsable values are logged and replaced by defaults; calls that
    /// need a missing token will then yield no data.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = |key: &str, default: ProviderBackend| match var(key) {
            Some(raw) => raw.parse::<ProviderBackend>().unwrap_or_else(|e| {
                warn!(key, error = %e, "Falling back to Mapbox");
                ProviderBackend::Mapbox
            }),
            None => default,
        };
        let isochrone_backend =
            backend("MEETPOINT_ISOCHRONE_PROVIDER", defaults.isochrone_backend);
        let geocoding_backend =
            backend("MEETPOINT_GEOCODING_PROVIDER", defaults.geocoding_backend);
        let uses = |wanted: ProviderBackend| {
            isochrone_backend == wanted || geocoding_backend == wanted
        };

        let mapbox_token = var("MAPBOX_TOKEN").unwrap_or_default();
        if uses(ProviderBackend::Mapbox) && mapbox_token.is_empty() {
            warn!("MAPBOX_TOKEN not set. Mapbox requests will return no data.");
        }

        let ors_token = var("ORS_TOKEN").unwrap_or_default();
        if uses(ProviderBackend::OpenRouteService) && ors_token.is_empty() {
            warn!("ORS_TOKEN not set. OpenRouteService requests will return no data.");
        }

        let bind = match var("MEETPOINT_BIND") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!(value = %raw, error = %e, "Invalid MEETPOINT_BIND, using {DEFAULT_BIND}");
                defaults.bind
            }),
            None => defaults.bind,
        };

        let mut cache = defaults.cache;
        if let Some(raw) = var("MEETPOINT_CACHE_TTL_SECS") {
            match raw.parse() {
                Ok(secs) => cache.ttl = Duration::from_secs(secs),
                Err(e) => warn!(value = %raw, error = %e, "Invalid MEETPOINT_CACHE_TTL_SECS"),
            }
        }

        let mut search = defaults.search;
        if let Some(raw) = var("MEETPOINT_SEARCH_STRATEGY") {
            match raw.parse::<SearchStrategy>() {
                Ok(strategy) => search = search.with_strategy(strategy),
                Err(e) => warn!(error = %e, "Keeping default search strategy"),
            }
        }

        Self {
            mapbox_token,
            ors_token,
            isochrone_backend,
            geocoding_backend,
            bind,
            cache,
            search,
        }
    }
}
