//! OpenRouteService isochrone and geocoding (Pelias) client.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{BoundingBox, Position, Region, TransportMode, Venue};
use crate::engine::{AddressMatch, GeocodedAddress};

use super::error::ProviderError;
use super::{IsochroneResponse, endpoint, read_json};

/// Default base URL for the OpenRouteService API.
const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";

/// Configuration for the OpenRouteService client.
#[derive(Debug, Clone)]
pub struct OrsConfig {
    /// API key, sent in the `Authorization` header
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OrsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
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

/// Results requested per category search.
const SEARCH_SIZE: u32 = 25;

/// Candidates requested per address search.
const ADDRESS_SIZE: u32 = 5;

/// ORS routing profile for a transport mode.
pub fn profile(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::Driving => "driving-car",
        TransportMode::Walking => "foot-walking",
        TransportMode::Cycling => "cycling-regular",
    }
}

/// Request body for `POST /v2/isochrones/{profile}`.
#[derive(Debug, Serialize)]
struct IsochroneRequest {
    locations: [[f64; 2]; 1],
    /// Seconds
    range: [u32; 1],
    range_type: &'static str,
}

impl IsochroneRequest {
    fn new(position: Position, budget_minutes: u32) -> Self {
        Self {
            locations: [[position.lng, position.lat]],
            range: [budget_minutes.saturating_mul(60)],
            range_type: "time",
        }
    }
}

/// Client for the OpenRouteService isochrone and geocoding APIs.
#[derive(Debug, Clone)]
pub struct OrsClient {
    http: reqwest::Client,
    base_url: String,
    configured: bool,
}

impl OrsClient {
    /// Create a new OpenRouteService client.
    pub fn new(config: OrsConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();

        let configured = !config.api_key.is_empty();
        if configured {
            let api_key = HeaderValue::from_str(&config.api_key)
                .map_err(|_| ProviderError::NotConfigured("invalid ORS API key format".into()))?;
            headers.insert(AUTHORIZATION, api_key);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            configured,
        })
    }

    /// Fetch the area reachable from `position` within `budget_minutes`.
    pub async fn isochrone(
        &self,
        position: Position,
        budget_minutes: u32,
        mode: TransportMode,
    ) -> Result<Option<Region>, ProviderError> {
        self.ensure_configured()?;
        let url = endpoint(&self.base_url, &["v2", "isochrones", profile(mode)])?;

        debug!(%position, budget_minutes, profile = profile(mode), "Fetching ORS isochrone");

        let response = self
            .http
            .post(url)
            .json(&IsochroneRequest::new(position, budget_minutes))
            .send()
            .await?;

        let body: IsochroneResponse = read_json(response).await?;
        body.into_region()
    }

    fn ensure_configured(&self) -> Result<(), ProviderError> {
        if !self.configured {
            return Err(ProviderError::NotConfigured("ORS_TOKEN is not set".into()));
        }
        Ok(())
    }

    async fn geocode(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<PeliasResponse, ProviderError> {
        self.ensure_configured()?;
        let url = endpoint(&self.base_url, &["geocode", path])?;
        let response = self.http.get(url).query(params).send().await?;
        read_json(response).await
    }

    /// Text search for `category` focused on `point` and bounded by `bbox`.
    pub async fn category_search(
        &self,
        category: &str,
        point: Position,
        bbox: BoundingBox,
    ) -> Result<Vec<Venue>, ProviderError> {
        let [min_lng, min_lat, max_lng, max_lat]: [f64; 4] = bbox.into();
        let body = self
            .geocode(
                "search",
                &[
                    ("text", category.to_string()),
                    ("focus.point.lon", point.lng.to_string()),
                    ("focus.point.lat", point.lat.to_string()),
                    ("boundary.rect.min_lon", min_lng.to_string()),
                    ("boundary.rect.min_lat", min_lat.to_string()),
                    ("boundary.rect.max_lon", max_lng.to_string()),
                    ("boundary.rect.max_lat", max_lat.to_string()),
                    ("size", SEARCH_SIZE.to_string()),
                ],
            )
            .await?;

        let venues: Vec<Venue> = body
            .features
            .into_iter()
            .map(|f| f.into_venue(category, point))
            .collect();

        debug!(category, %point, count = venues.len(), "ORS category search");
        Ok(venues)
    }

    /// Forward geocoding of a free-text address.
    pub async fn forward(&self, query: &str) -> Result<Vec<AddressMatch>, ProviderError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let body = self
            .geocode(
                "search",
                &[("text", query.to_string()), ("size", ADDRESS_SIZE.to_string())],
            )
            .await?;

        let matches = body.into_matches();
        debug!(query, count = matches.len(), "ORS address search");
        Ok(matches)
    }

    /// Label of the feature nearest to `point`.
    pub async fn reverse(&self, point: Position) -> Result<Option<GeocodedAddress>, ProviderError> {
        let body = self
            .geocode(
                "reverse",
                &[
                    ("point.lon", point.lng.to_string()),
                    ("point.lat", point.lat.to_string()),
                    ("size", "1".to_string()),
                ],
            )
            .await?;
        Ok(body.into_address())
    }
}

/// Pelias `/geocode/search` and `/geocode/reverse` response.
#[derive(Debug, Deserialize)]
struct PeliasResponse {
    #[serde(default)]
    features: Vec<PeliasFeature>,
}

#[derive(Debug, Deserialize)]
struct PeliasFeature {
    geometry: Option<PeliasPoint>,
    #[serde(default)]
    properties: PeliasProperties,
}

#[derive(Debug, Deserialize)]
struct PeliasPoint {
    #[serde(default)]
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct PeliasProperties {
    id: Option<String>,
    gid: Option<String>,
    name: Option<String>,
    label: Option<String>,
}

impl PeliasFeature {
    fn position(&self) -> Option<Position> {
        match self.geometry.as_ref().map(|g| g.coordinates.as_slice()) {
            Some([lng, lat, ..]) if lng.is_finite() && lat.is_finite() => {
                Some(Position::new(*lng, *lat))
            }
            _ => None,
        }
    }

    /// Name falls back to the query term, then the label; address to
    /// "Unknown"; coordinates to the query point.
    fn into_venue(self, category: &str, query_point: Position) -> Venue {
        let position = self.position().unwrap_or(query_point);
        let PeliasProperties {
            id,
            gid,
            name,
            label,
        } = self.properties;

        let display_name = name.unwrap_or_else(|| category.to_string());
        let address = label.unwrap_or_else(|| "Unknown".to_string());
        let id = id
            .or(gid)
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

impl PeliasResponse {
    fn into_matches(self) -> Vec<AddressMatch> {
        self.features
            .into_iter()
            .filter_map(|f| {
                let position = f.position()?;
                let PeliasProperties {
                    id,
                    gid,
                    name,
                    label,
                } = f.properties;
                let label = label
                    .or_else(|| name.clone())
                    .unwrap_or_else(|| position.fallback_label());
                let name = name.unwrap_or_else(|| label.clone());
                let id = gid.or(id).unwrap_or_else(|| format!("{name}@{position}"));
                Some(AddressMatch {
                    id,
                    name,
                    label,
                    position,
                })
            })
            .collect()
    }

    fn into_address(self) -> Option<GeocodedAddress> {
        self.features
            .into_iter()
            .next()
            .and_then(|f| f.properties.label)
            .filter(|label| !label.trim().is_empty())
            .map(|display_address| GeocodedAddress { display_address })
    }
}
