//! Polygonal regions: isochrones and their overlaps.

use geo::{Area, MultiPolygon, Polygon};

use super::DomainError;

/// A polygon or multi-polygon in `(lng, lat)` degrees.
///
/// Isochrone providers return either shape, and intersecting two regions can
/// split a polygon into disjoint parts, so both are first-class.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl Region {
    /// Build a region from boolean-operation output.
    ///
    /// Parts with zero area (edges or points where the inputs merely touch)
    /// are dropped. Returns `None` if nothing with positive area remains.
    /// A single surviving part is returned as a plain polygon.
    pub fn from_multi_polygon(mp: MultiPolygon<f64>) -> Option<Self> {
        let mut parts: Vec<Polygon<f64>> = mp
            .into_iter()
            .filter(|p| p.unsigned_area() > 0.0)
            .collect();

        match parts.len() {
            0 => None,
            1 => parts.pop().map(Region::Polygon),
            _ => Some(Region::MultiPolygon(MultiPolygon::new(parts))),
        }
    }

    /// The region as a multi-polygon (a polygon becomes a one-part collection).
    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        match self {
            Region::Polygon(p) => MultiPolygon::new(vec![p.clone()]),
            Region::MultiPolygon(mp) => mp.clone(),
        }
    }

    /// Planar area in square degrees.
    pub fn area(&self) -> f64 {
        match self {
            Region::Polygon(p) => p.unsigned_area(),
            Region::MultiPolygon(mp) => mp.unsigned_area(),
        }
    }

    /// Number of disjoint parts.
    pub fn part_count(&self) -> usize {
        match self {
            Region::Polygon(_) => 1,
            Region::MultiPolygon(mp) => mp.0.len(),
        }
    }

    /// True when the region encloses no area.
    ///
    /// A provider can hand back a polygon with no rings or a collapsed ring;
    /// such a region is "computed but empty", not "absent".
    pub fn is_empty(&self) -> bool {
        self.area() <= 0.0
    }

    /// Convert to a GeoJSON geometry object.
    pub fn to_geojson(&self) -> geojson::Geometry {
        match self {
            Region::Polygon(p) => geojson::Geometry::new(geojson::GeometryValue::from(p)),
            Region::MultiPolygon(mp) => geojson::Geometry::new(geojson::GeometryValue::from(mp)),
        }
    }
}

impl From<Polygon<f64>> for Region {
    fn from(p: Polygon<f64>) -> Self {
        Region::Polygon(p)
    }
}

impl From<MultiPolygon<f64>> for Region {
    fn from(mp: MultiPolygon<f64>) -> Self {
        Region::MultiPolygon(mp)
    }
}

impl TryFrom<geojson::GeometryValue> for Region {
    type Error = DomainError;

    fn try_from(value: geojson::GeometryValue) -> Result<Self, Self::Error> {
        match value {
            v @ geojson::GeometryValue::Polygon { .. } => Polygon::<f64>::try_from(v)
                .map(Region::Polygon)
                .map_err(|e| DomainError::InvalidGeometry(e.to_string())),
            v @ geojson::GeometryValue::MultiPolygon { .. } => MultiPolygon::<f64>::try_from(v)
                .map(Region::MultiPolygon)
                .map_err(|e| DomainError::InvalidGeometry(e.to_string())),
            _ => Err(DomainError::UnsupportedGeometry),
        }
    }
}

impl TryFrom<geojson::Geometry> for Region {
    type Error = DomainError;

    fn try_from(geometry: geojson::Geometry) -> Result<Self, Self::Error> {
        Region::try_from(geometry.value)
    }
}
