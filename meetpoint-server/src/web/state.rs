//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedIsochroneProvider;
use crate::config::AppConfig;
use crate::engine::SearchConfig;
use crate::providers::{
    GeocodingClient, IsochroneClient, MapboxClient, MapboxConfig, OrsClient, OrsConfig,
    ProviderBackend, ProviderError,
};

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached isochrone client (Mapbox or OpenRouteService)
    pub isochrones: Arc<CachedIsochroneProvider<IsochroneClient>>,

    /// Venue search, address search and reverse geocoding
    pub geocoding: Arc<GeocodingClient>,

    /// Engine configuration
    pub config: Arc<SearchConfig>,
}

impl AppState {
    /// Build clients for the configured providers.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let mapbox = MapboxClient::new(MapboxConfig::new(&config.mapbox_token))?;
        let ors = OrsClient::new(OrsConfig::new(&config.ors_token))?;

        let isochrones = match config.isochrone_backend {
            ProviderBackend::Mapbox => IsochroneClient::Mapbox(mapbox.clone()),
            ProviderBackend::OpenRouteService => IsochroneClient::Ors(ors.clone()),
        };
        let geocoding = match config.geocoding_backend {
            ProviderBackend::Mapbox => GeocodingClient::Mapbox(mapbox),
            ProviderBackend::OpenRouteService => GeocodingClient::Ors(ors),
        };

        Ok(Self {
            isochrones: Arc::new(CachedIsochroneProvider::new(isochrones, &config.cache)),
            geocoding: Arc::new(geocoding),
            config: Arc::new(config.search.clone()),
        })
    }
}
