//! Venues found inside an overlap region.

use serde::{Deserialize, Serialize};

use super::Position;

/// A point of interest returned by a nearby search.
///
/// Venues are query results: never mutated, replaced wholesale whenever the
/// overlap region is recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    /// Provider-assigned identifier
    pub id: String,

    /// Venue name
    pub display_name: String,

    /// Formatted address
    pub address: String,

    pub position: Position,

    /// Category id the venue was discovered under (e.g. "coffee")
    pub source_category: String,
}

/// Identity used to merge results from different sample points.
///
/// Two venues are the same iff name and exact coordinates match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VenueKey {
    display_name: String,
    position_bits: (u64, u64),
}

impl Venue {
    pub fn key(&self) -> VenueKey {
        VenueKey {
            display_name: self.display_name.clone(),
            position_bits: self.position.bits(),
        }
    }
}
