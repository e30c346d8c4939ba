//! Mapbox isochrone, Search Box and geocoding client.

use serde::Deserialize;
use tracing::debug;

use crate::domain::{BoundingBox, Position, Region, TransportMode, Venue};
use crate::engine::{AddressMatch, GeocodedAddress};

use super::error::ProviderError;
use super::{IsochroneResponse, endpoint, read_json};

/// Default base URL for the Mapbox APIs.
const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";

/// Results requested per category search.
const SEARCH_LIMIT: u32 = 25;

/// Candidates requested per address search.
const ADDRESS_LIMIT: u32 = 5;

/// Configuration for the Mapbox client.
#[derive(Debug, Clone)]
pub struct MapboxConfig {
    /// Access token, sent as the `access_token` query parameter
    pub token: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl MapboxConfig {
    /// Create a new config with the given access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the Mapbox web APIs.
#[derive(Debug, Clone)]
pub struct MapboxClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl MapboxClient {
    /// Create a new Mapbox client.
    pub fn new(config: MapboxConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            token: config.token,
        })
    }

    fn token(&self) -> Result<&str, ProviderError> {
        if self.token.is_empty() {
            return Err(ProviderError::NotConfigured("MAPBOX_TOKEN is not set".into()));
        }
        Ok(&self.token)
    }

    /// Fetch the area reachable from `position` within `budget_minutes`.
    pub async fn isochrone(
        &self,
        position: Position,
        budget_minutes: u32,
        mode: TransportMode,
    ) -> Result<Option<Region>, ProviderError> {
        let token = self.token()?;
        let url = endpoint(
            &self.base_url,
            &[
                "isochrone",
                "v1",
                "mapbox",
                mode.as_str(),
                &position.to_string(),
            ],
        )?;

        debug!(%position, budget_minutes, %mode, "Fetching Mapbox isochrone");

        let response = self
            .http
            .get(url)
            .query(&[
                ("contours_minutes", budget_minutes.to_string()),
                ("polygons", "true".to_string()),
                ("access_token", token.to_string()),
            ])
            .send()
            .await?;

        let body: IsochroneResponse = read_json(response).await?;
        body.into_region()
    }

    /// Category search near `point`, restricted to `bbox`.
    pub async fn category_search(
        &self,
        category: &str,
        point: Position,
        bbox: BoundingBox,
    ) -> Result<Vec<Venue>, ProviderError> {
        let token = self.token()?;
        let url = endpoint(&self.base_url, &["search", "searchbox", "v1", "category", category])?;

        let response = self
            .http
            .get(url)
            .query(&[
                ("access_token", token.to_string()),
                ("proximity", point.to_string()),
                ("limit", SEARCH_LIMIT.to_string()),
                ("language", "en".to_string()),
                ("bbox", bbox.to_query_param()),
            ])
            .send()
            .await?;

        let body: SearchResponse = read_json(response).await?;
        let venues: Vec<Venue> = body
            .features
            .into_iter()
            .map(|f| f.into_venue(category, point))
            .collect();

        debug!(category, %point, count = venues.len(), "Mapbox category search");
        Ok(venues)
    }

    /// Address of the feature nearest to `point`.
    pub async fn reverse(&self, point: Position) -> Result<Option<GeocodedAddress>, ProviderError> {
        let token = self.token()?;
        let url = endpoint(
            &self.base_url,
            &[
                "geocoding",
                "v5",
                "mapbox.places",
                &format!("{point}.json"),
            ],
        )?;

        let response = self
            .http
            .get(url)
            .query(&[("access_token", token), ("limit", "1")])
            .send()
            .await?;

        let body: ReverseResponse = read_json(response).await?;
        Ok(body.into_address())
    }

    /// Autocompleting forward geocoding of a free-text address.
    pub async fn forward(&self, query: &str) -> Result<Vec<AddressMatch>, ProviderError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let token = self.token()?;
        let url = endpoint(
            &self.base_url,
            &["geocoding", "v5", "mapbox.places", &format!("{query}.json")],
        )?;

        let response = self
            .http
            .get(url)
            .query(&[
                ("access_token", token.to_string()),
                ("autocomplete", "true".to_string()),
                ("limit", ADDRESS_LIMIT.to_string()),
            ])
            .send()
            .await?;

        let body: ForwardResponse = read_json(response).await?;
        let matches = body.into_matches();
        debug!(query, count = matches.len(), "Mapbox address search");
        Ok(matches)
    }
}

/// Search Box category response.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    features: Vec<SearchFeature>,
}

#[derive(Debug, Deserialize)]
struct SearchFeature {
    id: Option<String>,
    geometry: Option<PointGeometry>,
    #[serde(default)]
    properties: SearchProperties,
}

#[derive(Debug, Deserialize)]
struct PointGeometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchProperties {
    mapbox_id: Option<String>,
    name: Option<String>,
    name_preferred: Option<String>,
    full_address: Option<String>,
    place_formatted: Option<String>,
}

impl SearchFeature {
    /// Convert to a venue. Missing names fall back to the query term,
    /// missing addresses to "Unknown", missing coordinates to the query
    /// point.
    fn into_venue(self, category: &str, query_point: Position) -> Venue {
        let position = match self.geometry.as_ref().map(|g| g.coordinates.as_slice()) {
            Some([lng, lat, ..]) if lng.is_finite() && lat.is_finite() => {
                Position::new(*lng, *lat)
            }
            _ => query_point,
        };

        let SearchProperties {
            mapbox_id,
            name,
            name_preferred,
            full_address,
            place_formatted,
        } = self.properties;

        let display_name = name
            .or(name_preferred)
            .unwrap_or_else(|| category.to_string());
        let address = full_address
            .or(place_formatted)
            .unwrap_or_else(|| "Unknown".to_string());
        let id = self
            .id
            .or(mapbox_id)
            .unwrap_or_else(|| format!("{display_name}@{position}"));

        Venue {
            id,
            display_name,
            address,
            position,
            source_category: String::new(),
        }
    }
}

/// Geocoding v5 response.
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    features: Vec<ReverseFeature>,
}

#[derive(Debug, Deserialize)]
struct ReverseFeature {
    place_name: Option<String>,
}

impl ReverseResponse {
    fn into_address(self) -> Option<GeocodedAddress> {
        self.features
            .into_iter()
            .next()
            .and_then(|f| f.place_name)
            .filter(|name| !name.trim().is_empty())
            .map(|display_address| GeocodedAddress { display_address })
    }
}

/// Geocoding v5 forward response.
#[derive(Debug, Deserialize)]
struct ForwardResponse {
    #[serde(default)]
    features: Vec<ForwardFeature>,
}

#[derive(Debug, Deserialize)]
struct ForwardFeature {
    id: Option<String>,
    text: Option<String>,
    place_name: Option<String>,
    #[serde(default)]
    center: Vec<f64>,
}

impl ForwardResponse {
    /// Features without usable coordinates are dropped.
    fn into_matches(self) -> Vec<AddressMatch> {
        self.features
            .into_iter()
            .filter_map(|f| {
                let position = match f.center.as_slice() {
                    [lng, lat, ..] if lng.is_finite() && lat.is_finite() => {
                        Position::new(*lng, *lat)
                    }
                    _ => return None,
                };
                let label = f
                    .place_name
                    .or_else(|| f.text.clone())
                    .unwrap_or_else(|| position.fallback_label());
                let name = f.text.unwrap_or_else(|| label.clone());
                let id = f.id.unwrap_or_else(|| format!("{name}@{position}"));
                Some(AddressMatch {
                    id,
                    name,
                    label,
                    position,
                })
            })
            .collect()
    }
}
