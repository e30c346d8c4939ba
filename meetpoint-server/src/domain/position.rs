//! Geographic positions and axis-aligned bounding boxes.
//!
//! Coordinates are WGS84 degrees (EPSG:4326) in `(lng, lat)` order, the
//! same order GeoJSON and the routing providers use.

use std::fmt;

use geo::{Coord, Point, Rect};
use serde::{Deserialize, Serialize};

/// A `(lng, lat)` pair in degrees.
///
/// Serialized as a two-element array, `[lng, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Position {
    pub lng: f64,
    pub lat: f64,
}

impl Position {
    /// Create a new position from longitude and latitude.
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }

    /// Exact bit patterns of both components, with `-0.0` read as `0.0`.
    ///
    /// Used wherever positions need `Eq + Hash` (cache keys, venue identity).
    pub fn bits(&self) -> (u64, u64) {
        (canonical_bits(self.lng), canonical_bits(self.lat))
    }

    /// Short human-readable label used when no address is known.
    pub fn fallback_label(&self) -> String {
        format!("{:.4}, {:.4}", self.lng, self.lat)
    }

    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }
}

fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lng, self.lat)
    }
}

impl From<[f64; 2]> for Position {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        [p.lng, p.lat]
    }
}

impl From<Coord<f64>> for Position {
    fn from(c: Coord<f64>) -> Self {
        Self { lng: c.x, lat: c.y }
    }
}

impl From<Point<f64>> for Position {
    fn from(p: Point<f64>) -> Self {
        Self {
            lng: p.x(),
            lat: p.y(),
        }
    }
}

/// Axis-aligned bounding box `[min_lng, min_lat, max_lng, max_lat]`.
///
/// Bounds are inclusive and may be degenerate (a line or a single point).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub const fn new(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Self {
        Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_lng - self.min_lng
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Position) -> bool {
        p.lng >= self.min_lng && p.lng <= self.max_lng && p.lat >= self.min_lat && p.lat <= self.max_lat
    }

    /// Move `p` onto the nearest point of the box.
    pub fn clamp(&self, p: Position) -> Position {
        Position::new(
            p.lng.clamp(self.min_lng, self.max_lng),
            p.lat.clamp(self.min_lat, self.max_lat),
        )
    }

    /// Comma-separated form used in provider query strings.
    pub fn to_query_param(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lng, self.min_lat, self.max_lng, self.max_lat
        )
    }
}

impl From<Rect<f64>> for BoundingBox {
    fn from(rect: Rect<f64>) -> Self {
        let (min, max) = (rect.min(), rect.max());
        Self::new(min.x, min.y, max.x, max.y)
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from([min_lng, min_lat, max_lng, max_lat]: [f64; 4]) -> Self {
        Self::new(min_lng, min_lat, max_lng, max_lat)
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.min_lng, b.min_lat, b.max_lng, b.max_lat]
    }
}
