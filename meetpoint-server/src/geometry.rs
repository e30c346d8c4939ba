//! Planar geometry over `(lng, lat)` regions.
//!
//! All math runs directly on WGS84 degrees with no projection. At city
//! scale (the travel budgets this engine deals with are at most an hour)
//! the distortion is negligible; for continental-scale isochrones areas and
//! intersections would be noticeably skewed, growing with latitude.

use geo::{BooleanOps, BoundingRect, Centroid, Intersects};

use crate::domain::{BoundingBox, Position, Region};

/// Intersection of two regions.
///
/// Returns `None` when the regions are disjoint or only share boundary
/// (an edge or a vertex, zero area). Multi-part inputs are fine and the
/// result may itself have several parts.
pub fn intersect(a: &Region, b: &Region) -> Option<Region> {
    // Cheap reject before running the sweep.
    let (box_a, box_b) = (bounding_box(a)?, bounding_box(b)?);
    if box_a.max_lng < box_b.min_lng
        || box_b.max_lng < box_a.min_lng
        || box_a.max_lat < box_b.min_lat
        || box_b.max_lat < box_a.min_lat
    {
        return None;
    }

    let result = match (a, b) {
        (Region::Polygon(pa), Region::Polygon(pb)) => pa.intersection(pb),
        (Region::Polygon(pa), Region::MultiPolygon(mb)) => pa.intersection(mb),
        (Region::MultiPolygon(ma), Region::Polygon(pb)) => ma.intersection(pb),
        (Region::MultiPolygon(ma), Region::MultiPolygon(mb)) => ma.intersection(mb),
    };

    Region::from_multi_polygon(result)
}

/// Axis-aligned bounding box. `None` only for a region with no vertices.
pub fn bounding_box(region: &Region) -> Option<BoundingBox> {
    let rect = match region {
        Region::Polygon(p) => p.bounding_rect(),
        Region::MultiPolygon(mp) => mp.bounding_rect(),
    };
    rect.map(BoundingBox::from)
}

/// Area-weighted centroid; for multi-part regions, of the union of parts.
///
/// Not the mean of the vertices, and for concave shapes not necessarily
/// inside the region, but always inside its bounding box. Degenerate
/// (zero-area) regions fall back to the centroid of their outline.
pub fn centroid(region: &Region) -> Option<Position> {
    let point = match region {
        Region::Polygon(p) => p.centroid(),
        Region::MultiPolygon(mp) => mp.centroid(),
    };
    point.map(Position::from)
}

/// Point-in-region test. Points on an edge or vertex count as inside.
pub fn contains_point(region: &Region, point: Position) -> bool {
    let point = point.to_point();
    match region {
        Region::Polygon(p) => p.intersects(&point),
        Region::MultiPolygon(mp) => mp.intersects(&point),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use geo::{MultiPolygon, Polygon, polygon};

    use crate::domain::Region;

    /// Axis-aligned square with the given center and side length.
    pub fn square(cx: f64, cy: f64, side: f64) -> Region {
        let h = side / 2.0;
        Region::Polygon(polygon![
            (x: cx - h, y: cy - h),
            (x: cx + h, y: cy - h),
            (x: cx + h, y: cy + h),
            (x: cx - h, y: cy + h),
        ])
    }

    /// Axis-aligned rectangle from its corners.
    pub fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Polygon<f64> {
        polygon![
            (x: min_x, y: min_y),
            (x: max_x, y: min_y),
            (x: max_x, y: max_y),
            (x: min_x, y: max_y),
        ]
    }

    pub fn multi(parts: Vec<Polygon<f64>>) -> Region {
        Region::MultiPolygon(MultiPolygon::new(parts))
    }
}


#[cfg(test)]
mod proptests {
    use super::fixtures::rect;
    use super::*;
    use geo::{MultiPolygon, polygon};
    use proptest::prelude::*;

    /// Rectangles somewhere in a city-sized window.
    fn arb_rect() -> impl Strategy<Value = (f64, f64, f64, f64)> {
        (-1.0..1.0f64, -1.0..1.0f64, 0.001..0.5f64, 0.001..0.5f64)
            .prop_map(|(x, y, w, h)| (x, y, x + w, y + h))
    }

    /// Triangles with non-collinear vertices.
    fn arb_triangle() -> impl Strategy<Value = Region> {
        (
            (-1.0..1.0f64, -1.0..1.0f64),
            (-1.0..1.0f64, -1.0..1.0f64),
            (-1.0..1.0f64, -1.0..1.0f64),
        )
            .prop_filter("non-degenerate", |((ax, ay), (bx, by), (cx, cy))| {
                ((bx - ax) * (cy - ay) - (by - ay) * (cx - ax)).abs() > 1e-6
            })
            .prop_map(|((ax, ay), (bx, by), (cx, cy))| {
                Region::Polygon(polygon![(x: ax, y: ay), (x: bx, y: by), (x: cx, y: cy)])
            })
    }

    /// L-shaped polygons: a rectangle with one corner notched out.
    fn arb_concave() -> impl Strategy<Value = Region> {
        (arb_rect(), 0.1..0.9f64, 0.1..0.9f64).prop_map(|((x0, y0, x1, y1), fx, fy)| {
            let xm = x0 + (x1 - x0) * fx;
            let ym = y0 + (y1 - y0) * fy;
            Region::Polygon(polygon![
                (x: x0, y: y0),
                (x: x1, y: y0),
                (x: x1, y: ym),
                (x: xm, y: ym),
                (x: xm, y: y1),
                (x: x0, y: y1),
            ])
        })
    }

    /// Multipolygons of two to four triangles.
    fn arb_multi() -> impl Strategy<Value = Region> {
        proptest::collection::vec(arb_triangle(), 2..5).prop_map(|parts| {
            let polygons = parts
                .into_iter()
                .filter_map(|r| match r {
                    Region::Polygon(p) => Some(p),
                    Region::MultiPolygon(_) => None,
                })
                .collect();
            Region::MultiPolygon(MultiPolygon::new(polygons))
        })
    }

    fn arb_region() -> impl Strategy<Value = Region> {
        prop_oneof![arb_triangle(), arb_concave(), arb_multi()]
    }

    proptest! {
        /// Centroid always lies within the bounding box
        #[test]
        fn centroid_within_bbox(region in arb_region()) {
            let c = centroid(&region).unwrap();
            let b = bounding_box(&region).unwrap();
            prop_assert!(b.contains(c), "centroid {c:?} outside {b:?}");
        }

        /// Disjoint rectangles never intersect
        #[test]
        fn disjoint_rects_never_intersect(
            (x0, y0, x1, y1) in arb_rect(),
            gap in 0.0001..1.0f64,
            w in 0.001..0.5f64,
        ) {
            let a = Region::Polygon(rect(x0, y0, x1, y1));
            let b = Region::Polygon(rect(x1 + gap, y0, x1 + gap + w, y1));
            prop_assert!(intersect(&a, &b).is_none());
        }

        /// Intersection of overlapping rectangles is their common rectangle
        #[test]
        fn rect_intersection_matches_box_math(
            (ax0, ay0, ax1, ay1) in arb_rect(),
            (bx0, by0, bx1, by1) in arb_rect(),
        ) {
            let a = Region::Polygon(rect(ax0, ay0, ax1, ay1));
            let b = Region::Polygon(rect(bx0, by0, bx1, by1));
            let w = ax1.min(bx1) - ax0.max(bx0);
            let h = ay1.min(by1) - ay0.max(by0);

            match intersect(&a, &b) {
                Some(overlap) => {
                    prop_assert!(w > -1e-6 && h > -1e-6);
                    prop_assert!((overlap.area() - w.max(0.0) * h.max(0.0)).abs() < 1e-7);
                }
                None => prop_assert!(w <= 1e-6 || h <= 1e-6),
            }
        }

        /// Intersection is symmetric in area
        #[test]
        fn intersection_is_commutative(a in arb_triangle(), b in arb_triangle()) {
            let ab = intersect(&a, &b).map(|r| r.area()).unwrap_or(0.0);
            let ba = intersect(&b, &a).map(|r| r.area()).unwrap_or(0.0);
            prop_assert!((ab - ba).abs() < 1e-7);
        }
    }
}
