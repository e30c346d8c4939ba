//! Travelers and the caller-owned traveler set.

use std::fmt;

use rand::RngExt;
use serde::{Deserialize, Serialize};

use super::{DomainError, Position};

/// Opaque traveler identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TravelerId(String);

impl TravelerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random id.
    pub fn generate() -> Self {
        let n: u64 = rand::rng().random_range(0..u64::MAX);
        Self(format!("{n:016x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TravelerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TravelerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TravelerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Random `#rrggbb` marker color for a new traveler.
pub fn random_color_tag() -> String {
    let rgb: u32 = rand::rng().random_range(0..=0x00FF_FFFF);
    format!("#{rgb:06x}")
}

/// One person trying to reach the meeting point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Traveler {
    pub id: TravelerId,

    /// Optional user-chosen name ("Home", "Anna")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Formatted address of `position`
    pub address: String,

    pub position: Position,

    /// Marker color, e.g. "#ff00ff"
    pub color_tag: String,
}

impl Traveler {
    /// Create a traveler with a random color and no display name.
    pub fn new(id: impl Into<TravelerId>, address: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            address: address.into(),
            position,
            color_tag: random_color_tag(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_color_tag(mut self, color: impl Into<String>) -> Self {
        self.color_tag = color.into();
        self
    }
}

/// Ordered set of travelers with unique ids.
///
/// The set is owned by the caller; the engine only ever reads it. Position
/// changes are reported back so that the caller can drop the traveler's
/// cached isochrone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TravelerSet {
    travelers: Vec<Traveler>,
}

impl TravelerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.travelers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.travelers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Traveler> {
        self.travelers.iter()
    }

    pub fn as_slice(&self) -> &[Traveler] {
        &self.travelers
    }

    pub fn get(&self, id: &TravelerId) -> Option<&Traveler> {
        self.travelers.iter().find(|t| &t.id == id)
    }

    fn get_mut(&mut self, id: &TravelerId) -> Result<&mut Traveler, DomainError> {
        self.travelers
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| DomainError::UnknownTraveler(id.clone()))
    }

    /// Append a traveler. Ids must be unique.
    pub fn add(&mut self, traveler: Traveler) -> Result<(), DomainError> {
        if self.get(&traveler.id).is_some() {
            return Err(DomainError::DuplicateTraveler(traveler.id));
        }
        self.travelers.push(traveler);
        Ok(())
    }

    /// Append a traveler, replacing its id with a generated one while it
    /// collides with an existing id. Returns the id it was stored under.
    pub fn insert_fresh(&mut self, mut traveler: Traveler) -> TravelerId {
        while self.get(&traveler.id).is_some() {
            traveler.id = TravelerId::generate();
        }
        let id = traveler.id.clone();
        self.travelers.push(traveler);
        id
    }

    /// Move a traveler. Returns `true` if the position actually changed,
    /// in which case any isochrone computed for the old position is stale.
    pub fn relocate(&mut self, id: &TravelerId, position: Position) -> Result<bool, DomainError> {
        let traveler = self.get_mut(id)?;
        let moved = traveler.position != position;
        traveler.position = position;
        Ok(moved)
    }

    /// Update the formatted address (e.g. after reverse geocoding).
    pub fn set_address(
        &mut self,
        id: &TravelerId,
        address: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.get_mut(id)?.address = address.into();
        Ok(())
    }

    /// Change or clear the display name.
    pub fn rename(&mut self, id: &TravelerId, name: Option<String>) -> Result<(), DomainError> {
        self.get_mut(id)?.display_name = name;
        Ok(())
    }

    /// Remove a traveler, returning it.
    pub fn remove(&mut self, id: &TravelerId) -> Result<Traveler, DomainError> {
        let idx = self
            .travelers
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| DomainError::UnknownTraveler(id.clone()))?;
        Ok(self.travelers.remove(idx))
    }

    pub fn clear(&mut self) {
        self.travelers.clear();
    }
}

impl TryFrom<Vec<Traveler>> for TravelerSet {
    type Error = DomainError;

    fn try_from(travelers: Vec<Traveler>) -> Result<Self, Self::Error> {
        let mut set = TravelerSet::new();
        for t in travelers {
            set.add(t)?;
        }
        Ok(set)
    }
}

impl<'a> IntoIterator for &'a TravelerSet {
    type Item = &'a Traveler;
    type IntoIter = std::slice::Iter<'a, Traveler>;

    fn into_iter(self) -> Self::IntoIter {
        self.travelers.iter()
    }
}
