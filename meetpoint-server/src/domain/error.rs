//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from provider (network) errors and from the classified meeting
//! outcomes produced by the engine.

use super::TravelerId;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A traveler with this id is already in the set
    #[error("traveler {0} already exists")]
    DuplicateTraveler(TravelerId),

    /// No traveler with this id
    #[error("unknown traveler {0}")]
    UnknownTraveler(TravelerId),

    /// GeoJSON geometry is not a Polygon or MultiPolygon
    #[error("unsupported geometry type: expected Polygon or MultiPolygon")]
    UnsupportedGeometry,

    /// GeoJSON coordinates could not be converted
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Unrecognised transport mode name
    #[error("unknown transport mode: {0}")]
    UnknownTransportMode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::DuplicateTraveler(TravelerId::from("a"));
        assert_eq!(err.to_string(), "traveler a already exists");

        let err = DomainError::UnknownTraveler(TravelerId::from("b"));
        assert_eq!(err.to_string(), "unknown traveler b");

        let err = DomainError::UnknownTransportMode("boat".into());
        assert_eq!(err.to_string(), "unknown transport mode: boat");
    }
}
