//! Data transfer objects for web requests and responses.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{
    BoundingBox, PoiCategory, Position, TransportMode, Traveler, TravelerId, TravelerSet, Venue,
    random_color_tag,
};
use crate::engine::{
    AddressMatch, BudgetProbe, IsochroneSet, MeetingPlan, Minimality, OptimizedPlan,
};
use crate::geometry::{bounding_box, centroid};
use crate::share::SharedTraveler;

/// A traveler as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct TravelerInput {
    /// Client-side id; generated when absent
    pub id: Option<String>,

    /// Optional display name
    pub display_name: Option<String>,

    /// Address; coordinates are used when absent
    pub address: Option<String>,

    /// `[lng, lat]`
    pub position: Position,

    /// `#rrggbb`; random when absent
    pub color_tag: Option<String>,
}

impl TravelerInput {
    pub fn into_traveler(self) -> Traveler {
        let id = self.id.map(TravelerId::new).unwrap_or_else(TravelerId::generate);
        let address = self
            .address
            .unwrap_or_else(|| self.position.fallback_label());
        let mut traveler = Traveler::new(id, address, self.position)
            .with_color_tag(self.color_tag.unwrap_or_else(random_color_tag));
        traveler.display_name = self.display_name;
        traveler
    }
}

/// Build a traveler set, rejecting duplicate ids.
pub fn traveler_set(inputs: Vec<TravelerInput>) -> Result<TravelerSet, crate::domain::DomainError> {
    TravelerSet::try_from(
        inputs
            .into_iter()
            .map(TravelerInput::into_traveler)
            .collect::<Vec<_>>(),
    )
}

/// Request to plan a meeting zone at a fixed budget.
#[derive(Debug, Deserialize)]
pub struct ZoneRequest {
    pub travelers: Vec<TravelerInput>,

    /// Minutes; server default when absent
    pub budget_minutes: Option<u32>,

    /// Defaults to driving
    #[serde(default)]
    pub mode: TransportMode,

    /// Category ids; server defaults when absent
    pub categories: Option<Vec<String>>,
}

/// Request to find the smallest feasible budget.
#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub travelers: Vec<TravelerInput>,

    #[serde(default)]
    pub mode: TransportMode,

    pub categories: Option<Vec<String>>,
}

/// One traveler's isochrone in a response.
#[derive(Debug, Serialize)]
pub struct IsochroneView {
    pub traveler_id: TravelerId,

    /// GeoJSON geometry; null when the provider had none
    pub region: Option<geojson::Geometry>,
}

impl IsochroneView {
    fn list(travelers: &[Traveler], isochrones: &IsochroneSet) -> Vec<Self> {
        travelers
            .iter()
            .map(|t| IsochroneView {
                traveler_id: t.id.clone(),
                region: isochrones
                    .get(&t.id)
                    .and_then(|iso| iso.region.as_ref())
                    .map(|r| r.to_geojson()),
            })
            .collect()
    }
}

/// Meeting zone at a fixed budget.
#[derive(Debug, Serialize)]
pub struct ZoneResponse {
    pub budget_minutes: u32,
    pub mode: TransportMode,

    /// Overlap region as a GeoJSON geometry
    pub overlap: geojson::Geometry,

    /// `[min_lng, min_lat, max_lng, max_lat]` of the overlap
    pub bbox: Option<BoundingBox>,

    /// Centroid of the overlap
    pub center: Option<Position>,

    pub isochrones: Vec<IsochroneView>,

    /// Venues inside the overlap, in discovery order
    pub venues: Vec<Venue>,

    /// Venue searches that failed
    pub failed_queries: usize,
}

impl ZoneResponse {
    pub fn from_plan(plan: &MeetingPlan, travelers: &[Traveler]) -> Self {
        Self {
            budget_minutes: plan.budget_minutes,
            mode: plan.mode,
            overlap: plan.overlap.to_geojson(),
            bbox: bounding_box(&plan.overlap),
            center: centroid(&plan.overlap),
            isochrones: IsochroneView::list(travelers, &plan.isochrones),
            venues: plan.discovery.venues.clone(),
            failed_queries: plan.discovery.failed_queries,
        }
    }
}

/// Meeting zone at the smallest feasible budget.
#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    /// Chosen budget in minutes
    pub budget_minutes: u32,
    pub mode: TransportMode,

    /// How certain it is that no smaller candidate works
    pub minimality: Minimality,

    /// Every budget tried, in order
    pub probes: Vec<BudgetProbe>,

    pub overlap: geojson::Geometry,
    pub bbox: Option<BoundingBox>,
    pub center: Option<Position>,
    pub isochrones: Vec<IsochroneView>,
    pub venues: Vec<Venue>,
    pub failed_queries: usize,
}

impl OptimizeResponse {
    pub fn from_plan(plan: &OptimizedPlan, travelers: &[Traveler]) -> Self {
        Self {
            budget_minutes: plan.budget_minutes,
            mode: plan.mode,
            minimality: plan.minimality,
            probes: plan.probes.clone(),
            overlap: plan.overlap.to_geojson(),
            bbox: bounding_box(&plan.overlap),
            center: centroid(&plan.overlap),
            isochrones: IsochroneView::list(travelers, &plan.isochrones),
            venues: plan.discovery.venues.clone(),
            failed_queries: plan.discovery.failed_queries,
        }
    }
}

/// Category catalogue.
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: &'static [PoiCategory],

    /// Ids selected by default
    pub defaults: Vec<String>,
}

/// Scenario to turn into a share token.
#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    pub budget_minutes: u32,

    #[serde(default)]
    pub transport_mode: TransportMode,

    #[serde(default)]
    pub poi_categories: BTreeSet<String>,

    pub travelers: Vec<SharedTraveler>,
}

/// A share token.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShareResponse {
    pub token: String,
}

/// Reverse geocoding query.
#[derive(Debug, Deserialize)]
pub struct ReverseQuery {
    pub lng: f64,
    pub lat: f64,
}

/// Reverse geocoding result.
#[derive(Debug, Serialize)]
pub struct ReverseResponse {
    pub position: Position,

    /// Provider address, or formatted coordinates
    pub address: String,
}

/// Address search query.
#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub q: Option<String>,
}

/// Address search candidates, best first.
#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    pub results: Vec<AddressMatch>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,

    /// Machine-readable class (e.g. "no_overlap")
    pub kind: &'static str,

    /// Some isochrone or search request behind this answer failed
    pub data_incomplete: bool,
}
