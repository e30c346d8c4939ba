//! Per-traveler isochrones and the overlap derived from them.
//!
//! Traveler state and derived geometry are kept apart: the caller owns the
//! traveler set, this module owns what was fetched for it, and the overlap
//! is recomputed from both on demand.

use std::collections::HashMap;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::{Region, TransportMode, Traveler, TravelerId};

use super::error::MeetingError;
use super::provider::IsochroneProvider;
use super::reduce::reduce;

/// What is known about one traveler's isochrone.
#[derive(Debug, Clone, PartialEq)]
pub struct Isochrone {
    pub budget_minutes: u32,
    pub mode: TransportMode,

    /// `None` when the fetch failed or the provider had no polygon. A
    /// polygon that encloses no area is kept as `Some` (computed but empty).
    pub region: Option<Region>,
}

impl Isochrone {
    fn matches(&self, budget_minutes: u32, mode: TransportMode) -> bool {
        self.budget_minutes == budget_minutes && self.mode == mode
    }
}

/// Isochrones keyed by traveler.
///
/// A traveler with no entry has not been computed yet. Entries are tagged
/// with the `(budget, mode)` they were fetched for; entries for another
/// pair count as missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IsochroneSet {
    entries: HashMap<TravelerId, Isochrone>,
}

impl IsochroneSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(
        &mut self,
        traveler: TravelerId,
        budget_minutes: u32,
        mode: TransportMode,
        region: Option<Region>,
    ) {
        self.entries.insert(
            traveler,
            Isochrone {
                budget_minutes,
                mode,
                region,
            },
        );
    }

    pub fn get(&self, traveler: &TravelerId) -> Option<&Isochrone> {
        self.entries.get(traveler)
    }

    /// The traveler's region, if fetched for exactly this budget and mode.
    pub fn region_for(
        &self,
        traveler: &TravelerId,
        budget_minutes: u32,
        mode: TransportMode,
    ) -> Option<&Region> {
        self.entries
            .get(traveler)
            .filter(|iso| iso.matches(budget_minutes, mode))
            .and_then(|iso| iso.region.as_ref())
    }

    /// Forget a traveler's isochrone (they moved or were removed).
    pub fn invalidate(&mut self, traveler: &TravelerId) -> Option<Isochrone> {
        self.entries.remove(traveler)
    }

    /// Drop every entry not fetched for this budget and mode.
    pub fn retain_matching(&mut self, budget_minutes: u32, mode: TransportMode) {
        self.entries.retain(|_, iso| iso.matches(budget_minutes, mode));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TravelerId, &Isochrone)> {
        self.entries.iter()
    }

    /// Travelers without a usable isochrone for this budget and mode.
    pub fn missing(
        &self,
        travelers: &[Traveler],
        budget_minutes: u32,
        mode: TransportMode,
    ) -> Vec<TravelerId> {
        travelers
            .iter()
            .filter(|t| self.region_for(&t.id, budget_minutes, mode).is_none())
            .map(|t| t.id.clone())
            .collect()
    }

    /// Overlap of every traveler's isochrone.
    ///
    /// Defined only when every traveler has one: otherwise the result is
    /// `InsufficientData`, never `NoOverlap`.
    pub fn overlap(
        &self,
        travelers: &[Traveler],
        budget_minutes: u32,
        mode: TransportMode,
    ) -> Result<Region, MeetingError> {
        if travelers.is_empty() {
            return Err(MeetingError::TooFewTravelers {
                required: 1,
                actual: 0,
            });
        }

        let missing = self.missing(travelers, budget_minutes, mode);
        if !missing.is_empty() {
            return Err(MeetingError::InsufficientData {
                missing,
                expected: travelers.len(),
            });
        }

        let regions = travelers
            .iter()
            .filter_map(|t| self.region_for(&t.id, budget_minutes, mode));

        reduce(regions).ok_or(MeetingError::NoOverlap { budget_minutes })
    }
}

/// Fetch every traveler's isochrone concurrently.
///
/// All requests are issued at once and awaited together. A failed request
/// is logged and recorded as a missing region; it does not affect the
/// others.
pub async fn fetch_isochrones<P: IsochroneProvider>(
    provider: &P,
    travelers: &[Traveler],
    budget_minutes: u32,
    mode: TransportMode,
) -> IsochroneSet {
    let futures: Vec<_> = travelers
        .iter()
        .map(|traveler| async move {
            let result = provider
                .fetch_isochrone(traveler.position, budget_minutes, mode)
                .await;
            (traveler, result)
        })
        .collect();

    let results = join_all(futures).await;

    let mut set = IsochroneSet::new();
    for (traveler, result) in results {
        let region = match result {
            Ok(Some(region)) => Some(region),
            Ok(None) => {
                debug!(
                    traveler = %traveler.id,
                    budget_minutes,
                    %mode,
                    "Provider returned no isochrone"
                );
                None
            }
            Err(e) => {
                warn!(
                    traveler = %traveler.id,
                    budget_minutes,
                    %mode,
                    error = %e,
                    "Failed to fetch isochrone"
                );
                None
            }
        };
        set.insert(traveler.id.clone(), budget_minutes, mode, region);
    }

    set
}
