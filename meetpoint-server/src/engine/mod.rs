//! Meeting-point engine.
//!
//! Answers "where can all of us get to within N minutes, and what is
//! there?": per-traveler isochrones are intersected into one overlap
//! region, the smallest budget with a non-empty overlap can be searched
//! for, and venues inside the overlap are discovered by sampling it.
//!
//! Providers are abstracted behind traits so the engine can be tested
//! with in-memory data.

mod budget;
mod config;
mod discovery;
mod error;
mod isochrones;
mod planner;
mod provider;
mod reduce;

#[cfg(test)]
pub(crate) mod testing;

/// Largest travel budget accepted anywhere, in minutes.
pub const MAX_BUDGET_MINUTES: u32 = 60;

pub use budget::{BudgetProbe, BudgetSearch, Minimality, OptimalBudget, ProbeOutcome};
pub use config::{SearchConfig, SearchStrategy};
pub use discovery::{DiscoveryResult, PoiDiscovery, QUADRANT_INSET, sample_points};
pub use error::MeetingError;
pub use isochrones::{Isochrone, IsochroneSet, fetch_isochrones};
pub use planner::{MeetingPlan, MeetingPlanner, OptimizedPlan};
pub use provider::{
    AddressMatch, AddressSearch, GeocodedAddress, IsochroneProvider, ReverseGeocoder, VenueSearch,
    resolve_address,
};
pub use reduce::reduce;
