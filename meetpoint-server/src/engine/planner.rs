//! Meeting zone planning: isochrones, overlap and venues in one call.

use serde::Serialize;
use tracing::info;

use crate::domain::{PoiCategory, Region, TransportMode, Traveler};

use super::budget::{BudgetProbe, BudgetSearch, Minimality};
use super::config::SearchConfig;
use super::discovery::{DiscoveryResult, PoiDiscovery};
use super::error::MeetingError;
use super::isochrones::{IsochroneSet, fetch_isochrones};
use super::provider::{IsochroneProvider, VenueSearch};
use super::MAX_BUDGET_MINUTES;

/// Meeting zone for a fixed budget.
#[derive(Debug, Clone)]
pub struct MeetingPlan {
    pub budget_minutes: u32,
    pub mode: TransportMode,
    pub isochrones: IsochroneSet,
    pub overlap: Region,
    pub discovery: DiscoveryResult,
}

/// Meeting zone at the smallest feasible budget.
#[derive(Debug, Clone)]
pub struct OptimizedPlan {
    pub budget_minutes: u32,
    pub mode: TransportMode,
    pub minimality: Minimality,
    pub probes: Vec<BudgetProbe>,
    pub isochrones: IsochroneSet,
    pub overlap: Region,
    pub discovery: DiscoveryResult,
}

/// Plans meeting zones using an isochrone provider and a venue search.
pub struct MeetingPlanner<'a, P: IsochroneProvider, S: VenueSearch> {
    isochrones: &'a P,
    venues: &'a S,
    config: &'a SearchConfig,
}

impl<'a, P: IsochroneProvider, S: VenueSearch> MeetingPlanner<'a, P, S> {
    pub fn new(isochrones: &'a P, venues: &'a S, config: &'a SearchConfig) -> Self {
        Self {
            isochrones,
            venues,
            config,
        }
    }

    /// Compute the meeting zone for a fixed budget and list venues in it.
    ///
    /// A single traveler is allowed; the zone is then their own isochrone.
    pub async fn plan_zone(
        &self,
        travelers: &[Traveler],
        budget_minutes: u32,
        mode: TransportMode,
        categories: &[&PoiCategory],
    ) -> Result<MeetingPlan, MeetingError> {
        if !(1..=MAX_BUDGET_MINUTES).contains(&budget_minutes) {
            return Err(MeetingError::InvalidBudget(budget_minutes));
        }
        if travelers.is_empty() {
            return Err(MeetingError::TooFewTravelers {
                required: 1,
                actual: 0,
            });
        }

        let isochrones = fetch_isochrones(self.isochrones, travelers, budget_minutes, mode).await;
        let overlap = isochrones.overlap(travelers, budget_minutes, mode)?;
        let discovery = self.discover(&overlap, categories).await;

        info!(
            travelers = travelers.len(),
            budget_minutes,
            %mode,
            venues = discovery.venues.len(),
            "Planned meeting zone"
        );

        Ok(MeetingPlan {
            budget_minutes,
            mode,
            isochrones,
            overlap,
            discovery,
        })
    }

    /// Find the smallest feasible budget, then list venues in its zone.
    pub async fn optimize(
        &self,
        travelers: &[Traveler],
        mode: TransportMode,
        categories: &[&PoiCategory],
    ) -> Result<OptimizedPlan, MeetingError> {
        let found = BudgetSearch::new(self.isochrones, self.config)
            .run(travelers, mode)
            .await?;
        let discovery = self.discover(&found.overlap, categories).await;

        Ok(OptimizedPlan {
            budget_minutes: found.budget_minutes,
            mode,
            minimality: found.minimality,
            probes: found.probes,
            isochrones: found.isochrones,
            overlap: found.overlap,
            discovery,
        })
    }

    async fn discover(&self, region: &Region, categories: &[&PoiCategory]) -> DiscoveryResult {
        PoiDiscovery::new(self.venues, self.config.max_results)
            .discover(region, categories)
            .await
    }
}
