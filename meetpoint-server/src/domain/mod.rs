//! Domain types for the meeting-point engine.
//!
//! These types carry the scenario a caller builds up: who is travelling,
//! from where, how, and what kind of venue they are looking for.

mod category;
mod error;
mod position;
mod region;
mod transport;
mod traveler;
mod venue;

pub use category::{DEFAULT_POI_CATEGORIES, POI_CATEGORIES, PoiCategory};
pub use error::DomainError;
pub use position::{BoundingBox, Position};
pub use region::Region;
pub use transport::TransportMode;
pub use traveler::{Traveler, TravelerId, TravelerSet, random_color_tag};
pub use venue::{Venue, VenueKey};
