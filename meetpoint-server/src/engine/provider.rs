//! Collaborator contracts the engine consumes.
//!
//! Implementations live in `crate::providers` (HTTP clients) and in tests
//! (in-memory mocks). Every method is a single independent request; the
//! engine decides how to fan them out.

use std::future::Future;

use serde::Serialize;
use tracing::debug;

use crate::domain::{BoundingBox, Position, Region, TransportMode, Venue};
use crate::providers::ProviderError;

/// Source of isochrone polygons.
pub trait IsochroneProvider: Send + Sync {
    /// Fetch the area reachable from `position` within `budget_minutes`.
    ///
    /// `Ok(None)` means the provider answered but had no polygon ("no
    /// route"); `Err` means the request itself failed. The engine treats
    /// both as a missing isochrone.
    fn fetch_isochrone(
        &self,
        position: Position,
        budget_minutes: u32,
        mode: TransportMode,
    ) -> impl Future<Output = Result<Option<Region>, ProviderError>> + Send;
}

/// Category search around a point.
pub trait VenueSearch: Send + Sync {
    /// Venues of `category` (provider vocabulary, e.g. "restaurant") near
    /// `point`, restricted to `bbox`. May be empty.
    fn search_nearby(
        &self,
        category: &str,
        point: Position,
        bbox: BoundingBox,
    ) -> impl Future<Output = Result<Vec<Venue>, ProviderError>> + Send;
}

/// Result of reverse geocoding a point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodedAddress {
    pub display_address: String,
}

/// Point to address lookup.
pub trait ReverseGeocoder: Send + Sync {
    fn reverse_geocode(
        &self,
        point: Position,
    ) -> impl Future<Output = Result<Option<GeocodedAddress>, ProviderError>> + Send;
}

/// A forward geocoding candidate, used to place a traveler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressMatch {
    pub id: String,

    /// Short name, e.g. the street or place
    pub name: String,

    /// Full display label
    pub label: String,

    pub position: Position,
}

/// Free-text address lookup.
pub trait AddressSearch: Send + Sync {
    /// Candidates for `query`, best first. A blank query yields none.
    fn search_address(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<AddressMatch>, ProviderError>> + Send;
}

/// Address for a point, falling back to its coordinates.
pub async fn resolve_address<G: ReverseGeocoder>(geocoder: &G, point: Position) -> String {
    match geocoder.reverse_geocode(point).await {
        Ok(Some(found)) => found.display_address,
        Ok(None) => point.fallback_label(),
        Err(e) => {
            debug!(point = %point, error = %e, "Reverse geocoding failed, using coordinates");
            point.fallback_label()
        }
    }
}
