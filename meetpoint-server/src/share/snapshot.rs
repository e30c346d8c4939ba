//! The scenario carried by a share token.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{Position, TransportMode, Traveler, TravelerId, TravelerSet};

use super::SHARE_VERSION;

/// One traveler as shared. Ids are not shared; the receiver assigns new
/// ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedTraveler {
    pub position: Position,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub color_tag: String,
}

impl From<&Traveler> for SharedTraveler {
    fn from(t: &Traveler) -> Self {
        Self {
            position: t.position,
            address: t.address.clone(),
            display_name: t.display_name.clone(),
            color_tag: t.color_tag.clone(),
        }
    }
}

/// A complete scenario: travelers, budget, mode and selected categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareSnapshot {
    pub version: u32,
    pub budget_minutes: u32,
    pub transport_mode: TransportMode,
    pub poi_categories: BTreeSet<String>,
    pub travelers: Vec<SharedTraveler>,
}

impl ShareSnapshot {
    /// Snapshot at the current version.
    pub fn new<'a>(
        travelers: impl IntoIterator<Item = &'a Traveler>,
        budget_minutes: u32,
        transport_mode: TransportMode,
        poi_categories: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            version: SHARE_VERSION,
            budget_minutes,
            transport_mode,
            poi_categories: poi_categories.into_iter().map(Into::into).collect(),
            travelers: travelers.into_iter().map(SharedTraveler::from).collect(),
        }
    }

    /// Rebuild a traveler set, assigning fresh ids in order.
    pub fn to_traveler_set(&self) -> TravelerSet {
        let mut set = TravelerSet::new();
        for shared in &self.travelers {
            let mut traveler = Traveler::new(
                TravelerId::generate(),
                shared.address.clone(),
                shared.position,
            )
            .with_color_tag(shared.color_tag.clone());
            traveler.display_name = shared.display_name.clone();
            set.insert_fresh(traveler);
        }
        set
    }
}
