//! In-memory collaborators for engine tests.

use std::sync::Mutex;

use crate::domain::{BoundingBox, Position, Region, TransportMode, Traveler, Venue};
use crate::providers::ProviderError;

use super::provider::{IsochroneProvider, VenueSearch};

pub fn traveler(id: &str, lng: f64, lat: f64) -> Traveler {
    Traveler::new(id, format!("{id} address"), Position::new(lng, lat)).with_color_tag("#123456")
}

pub fn venue(name: &str, lng: f64, lat: f64) -> Venue {
    Venue {
        id: format!("{name}@{lng},{lat}"),
        display_name: name.to_string(),
        address: format!("{name} street"),
        position: Position::new(lng, lat),
        source_category: String::new(),
    }
}

type IsochroneFn = dyn Fn(Position, u32) -> Option<Region> + Send + Sync;

/// Isochrone provider computing regions from a closure.
pub struct MockIsochrones {
    make: Box<IsochroneFn>,
    failing: Vec<Position>,
    calls: Mutex<Vec<(Position, u32)>>,
}

impl MockIsochrones {
    pub fn new(make: impl Fn(Position, u32) -> Option<Region> + Send + Sync + 'static) -> Self {
        Self {
            make: Box::new(make),
            failing: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Requests from this position fail with an API error.
    pub fn failing_at(mut self, lng: f64, lat: f64) -> Self {
        self.failing.push(Position::new(lng, lat));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Distinct budgets requested, in first-request order.
    pub fn budgets_probed(&self) -> Vec<u32> {
        let mut budgets = Vec::new();
        for (_, b) in self.calls.lock().unwrap().iter() {
            if !budgets.contains(b) {
                budgets.push(*b);
            }
        }
        budgets
    }
}

impl IsochroneProvider for MockIsochrones {
    async fn fetch_isochrone(
        &self,
        position: Position,
        budget_minutes: u32,
        _mode: TransportMode,
    ) -> Result<Option<Region>, ProviderError> {
        self.calls.lock().unwrap().push((position, budget_minutes));
        if self.failing.contains(&position) {
            return Err(ProviderError::Api {
                status: 503,
                message: "unavailable".into(),
            });
        }
        Ok((self.make)(position, budget_minutes))
    }
}

type VenueFn = dyn Fn(&str, Position) -> Result<Vec<Venue>, ProviderError> + Send + Sync;

/// Venue search answering from a closure.
pub struct MockVenues {
    respond: Box<VenueFn>,
    calls: Mutex<Vec<(String, Position, BoundingBox)>>,
}

impl MockVenues {
    pub fn new(
        respond: impl Fn(&str, Position) -> Result<Vec<Venue>, ProviderError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Position, BoundingBox)> {
        self.calls.lock().unwrap().clone()
    }
}

impl VenueSearch for MockVenues {
    async fn search_nearby(
        &self,
        category: &str,
        point: Position,
        bbox: BoundingBox,
    ) -> Result<Vec<Venue>, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((category.to_string(), point, bbox));
        (self.respond)(category, point)
    }
}
