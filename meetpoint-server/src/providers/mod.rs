//! HTTP clients for the isochrone, venue search and geocoding providers.
//!
//! Both isochrone services answer with a GeoJSON feature collection whose
//! first feature is the reachable area. Venue search and geocoding use the
//! Mapbox Search Box and geocoding APIs or the OpenRouteService Pelias API.

mod error;
mod mapbox;
mod ors;

use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::{BoundingBox, Position, Region, TransportMode, Venue};
use crate::engine::{
    AddressMatch, AddressSearch, GeocodedAddress, IsochroneProvider, ReverseGeocoder, VenueSearch,
};

pub use error::ProviderError;
pub use mapbox::{MapboxClient, MapboxConfig};
pub use ors::{OrsClient, OrsConfig};

/// Which service answers a class of requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderBackend {
    #[default]
    Mapbox,
    OpenRouteService,
}

impl std::str::FromStr for ProviderBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mapbox" => Ok(ProviderBackend::Mapbox),
            "ors" | "openrouteservice" => Ok(ProviderBackend::OpenRouteService),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

/// The configured isochrone client.
#[derive(Debug, Clone)]
pub enum IsochroneClient {
    Mapbox(MapboxClient),
    Ors(OrsClient),
}

impl IsochroneProvider for IsochroneClient {
    async fn fetch_isochrone(
        &self,
        position: Position,
        budget_minutes: u32,
        mode: TransportMode,
    ) -> Result<Option<Region>, ProviderError> {
        match self {
            IsochroneClient::Mapbox(client) => {
                client.isochrone(position, budget_minutes, mode).await
            }
            IsochroneClient::Ors(client) => client.isochrone(position, budget_minutes, mode).await,
        }
    }
}

/// The configured venue search and geocoding client.
#[derive(Debug, Clone)]
pub enum GeocodingClient {
    Mapbox(MapboxClient),
    Ors(OrsClient),
}

impl VenueSearch for GeocodingClient {
    async fn search_nearby(
        &self,
        category: &str,
        point: Position,
        bbox: BoundingBox,
    ) -> Result<Vec<Venue>, ProviderError> {
        match self {
            GeocodingClient::Mapbox(client) => client.category_search(category, point, bbox).await,
            GeocodingClient::Ors(client) => client.category_search(category, point, bbox).await,
        }
    }
}

impl ReverseGeocoder for GeocodingClient {
    async fn reverse_geocode(
        &self,
        point: Position,
    ) -> Result<Option<GeocodedAddress>, ProviderError> {
        match self {
            GeocodingClient::Mapbox(client) => client.reverse(point).await,
            GeocodingClient::Ors(client) => client.reverse(point).await,
        }
    }
}

impl AddressSearch for GeocodingClient {
    async fn search_address(&self, query: &str) -> Result<Vec<AddressMatch>, ProviderError> {
        match self {
            GeocodingClient::Mapbox(client) => client.forward(query).await,
            GeocodingClient::Ors(client) => client.forward(query).await,
        }
    }
}

/// Isochrone response body, shared by both services.
#[derive(Debug, Deserialize)]
struct IsochroneResponse {
    #[serde(default)]
    features: Vec<IsochroneFeature>,
}

#[derive(Debug, Deserialize)]
struct IsochroneFeature {
    geometry: Option<geojson::Geometry>,
}

impl IsochroneResponse {
    /// The first feature's polygon, if there is one.
    fn into_region(self) -> Result<Option<Region>, ProviderError> {
        let Some(geometry) = self.features.into_iter().next().and_then(|f| f.geometry) else {
            return Ok(None);
        };
        Region::try_from(geometry)
            .map(Some)
            .map_err(|e| ProviderError::Geometry(e.to_string()))
    }
}

/// Append path segments to a base URL, percent-encoding each one.
fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url, ProviderError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| ProviderError::NotConfigured(format!("invalid base URL {base_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| ProviderError::NotConfigured(format!("base URL {base_url} has no path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Check the status and decode the JSON body of a provider response.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ProviderError> {
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(ProviderError::Unauthorized);
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api {
            status: status.as_u16(),
            message: body.chars().take(500).collect(),
        });
    }

    let body = response.text().await?;
    parse_json(&body)
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::Json {
        message: e.to_string(),
    })
}
