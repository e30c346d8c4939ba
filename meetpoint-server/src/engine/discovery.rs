//! Venue discovery across an overlap region.
//!
//! A single query at the centroid under-samples long, thin overlaps (the
//! lens shapes typical for three or more travelers), so the region is
//! sampled at five points: the centroid and one interior point per
//! bounding-box quadrant.

use std::collections::HashSet;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{BoundingBox, PoiCategory, Position, Region, Venue};
use crate::geometry::{bounding_box, centroid, contains_point};

use super::provider::VenueSearch;

/// Fraction of the box width/height the quadrant points sit in from each
/// corner.
pub const QUADRANT_INSET: f64 = 0.25;

/// The five query points: center, then SW, SE, NW and NE quadrant points.
///
/// Every point is clamped into `bbox`.
pub fn sample_points(center: Position, bbox: &BoundingBox) -> [Position; 5] {
    let dx = bbox.width() * QUADRANT_INSET;
    let dy = bbox.height() * QUADRANT_INSET;

    [
        center,
        Position::new(bbox.min_lng + dx, bbox.min_lat + dy),
        Position::new(bbox.max_lng - dx, bbox.min_lat + dy),
        Position::new(bbox.min_lng + dx, bbox.max_lat - dy),
        Position::new(bbox.max_lng - dx, bbox.max_lat - dy),
    ]
    .map(|p| bbox.clamp(p))
}

/// Venues found in a region, plus query bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiscoveryResult {
    /// Unique venues inside the region, in discovery order.
    pub venues: Vec<Venue>,

    /// Number of nearby-search requests issued.
    pub queries: usize,

    /// Requests that failed and contributed nothing.
    pub failed_queries: usize,
}

/// What one sample point contributed.
#[derive(Default)]
struct PointResult {
    venues: Vec<Venue>,
    queries: usize,
    failed: usize,
}

/// Samples a region for venues using a nearby-search provider.
pub struct PoiDiscovery<'a, S: VenueSearch> {
    search: &'a S,
    max_results: usize,
}

impl<'a, S: VenueSearch> PoiDiscovery<'a, S> {
    pub fn new(search: &'a S, max_results: usize) -> Self {
        Self {
            search,
            max_results,
        }
    }

    /// Find up to `max_results` venues of the given categories inside
    /// `region`.
    ///
    /// Results from all sample points are merged in point order, merged by
    /// `(name, exact position)`, filtered to the region (boundary
    /// inclusive) and truncated. They are not ranked. Failed requests are
    /// absorbed: if everything fails the result is simply empty.
    pub async fn discover(
        &self,
        region: &Region,
        categories: &[&PoiCategory],
    ) -> DiscoveryResult {
        if categories.is_empty() || self.max_results == 0 {
            return DiscoveryResult::default();
        }
        let (Some(bbox), Some(center)) = (bounding_box(region), centroid(region)) else {
            return DiscoveryResult::default();
        };

        let points = sample_points(center, &bbox);
        let per_point = join_all(
            points
                .iter()
                .map(|&point| self.search_point(point, bbox, categories)),
        )
        .await;

        let mut result = DiscoveryResult::default();
        let mut seen = HashSet::new();
        let mut outside = 0;

        for point in per_point {
            result.queries += point.queries;
            result.failed_queries += point.failed;

            for venue in point.venues {
                if !seen.insert(venue.key()) {
                    continue;
                }
                if !contains_point(region, venue.position) {
                    outside += 1;
                    continue;
                }
                result.venues.push(venue);
            }
        }

        result.venues.truncate(self.max_results);

        debug!(
            venues = result.venues.len(),
            unique = seen.len(),
            outside,
            queries = result.queries,
            failed = result.failed_queries,
            "Venue discovery complete"
        );

        result
    }

    /// Query every category at one point, tagging results with the
    /// category id. A venue returned for two categories keeps the first.
    async fn search_point(
        &self,
        point: Position,
        bbox: BoundingBox,
        categories: &[&PoiCategory],
    ) -> PointResult {
        let mut result = PointResult::default();
        let mut seen_ids = HashSet::new();

        for category in categories {
            result.queries += 1;
            match self.search.search_nearby(category.query, point, bbox).await {
                Ok(found) => {
                    for mut venue in found {
                        if seen_ids.insert(venue.id.clone()) {
                            venue.source_category = category.id.to_string();
                            result.venues.push(venue);
                        }
                    }
                }
                Err(e) => {
                    result.failed += 1;
                    warn!(
                        category = category.id,
                        point = %point,
                        error = %e,
                        "Nearby search failed, skipping"
                    );
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{MockVenues, venue};
    use crate::geometry::fixtures::square;
    use crate::providers::ProviderError;
    use geo::polygon;

    fn near_center(p: Position) -> bool {
        (p.lng - 0.5).abs() < 1e-9 && (p.lat - 0.5).abs() < 1e-9
    }

    fn coffee() -> Vec<&'static PoiCategory> {
        PoiCategory::resolve(["coffee"])
    }

    #[test]
    fn five_point_fan() {
        let bbox = BoundingBox::new(0.0, 0.0, 4.0, 8.0);
        let points = sample_points(Position::new(2.0, 4.0), &bbox);
        assert_eq!(
            points,
            [
                Position::new(2.0, 4.0),
                Position::new(1.0, 2.0),
                Position::new(3.0, 2.0),
                Position::new(1.0, 6.0),
                Position::new(3.0, 6.0),
            ]
        );
    }

    #[test]
    fn points_are_clamped_into_bbox() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let points = sample_points(Position::new(5.0, -5.0), &bbox);
        assert_eq!(points[0], Position::new(1.0, 0.0));
        assert!(points.iter().all(|p| bbox.contains(*p)));
    }

    #[test]
    fn degenerate_bbox_collapses_points() {
        let bbox = BoundingBox::new(3.0, 3.0, 3.0, 3.0);
        let points = sample_points(Position::new(3.0, 3.0), &bbox);
        assert!(points.iter().all(|p| *p == Position::new(3.0, 3.0)));
    }

    #[tokio::test]
    async fn queries_every_point_with_region_bbox() {
        let search = MockVenues::new(|_, _| Ok(vec![]));
        let region = square(0.5, 0.5, 1.0);

        let result = PoiDiscovery::new(&search, 50)
            .discover(&region, &PoiCategory::resolve(["coffee", "meal"]))
            .await;

        assert!(result.venues.is_empty());
        assert_eq!(result.queries, 10);
        let calls = search.calls();
        assert_eq!(calls.len(), 10);
        assert!(
            calls
                .iter()
                .all(|(_, _, bbox)| *bbox == BoundingBox::new(0.0, 0.0, 1.0, 1.0))
        );
        assert!(calls.iter().any(|(q, _, _)| q == "restaurant"));
    }

    #[tokio::test]
    async fn venues_outside_region_are_dropped() {
        // Triangle with the right angle at the origin; (0.9, 0.9) is inside
        // the bbox but outside the triangle.
        let region = Region::Polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 0.0, y: 1.0),
        ]);
        let search = MockVenues::new(|_, _| {
            Ok(vec![
                venue("Inside", 0.2, 0.2),
                venue("Corner", 0.9, 0.9),
                venue("Edge", 0.5, 0.5),
            ])
        });

        let result = PoiDiscovery::new(&search, 50).discover(&region, &coffee()).await;

        let names: Vec<_> = result.venues.iter().map(|v| v.display_name.as_str()).collect();
        assert_eq!(names, ["Inside", "Edge"]);
    }

    #[tokio::test]
    async fn same_venue_from_several_points_appears_once() {
        let search = MockVenues::new(|_, _| Ok(vec![venue("Kavárna", 0.5, 0.5)]));
        let region = square(0.5, 0.5, 1.0);

        let result = PoiDiscovery::new(&search, 50).discover(&region, &coffee()).await;

        assert_eq!(result.venues.len(), 1);
        assert_eq!(result.venues[0].source_category, "coffee");
    }

    #[tokio::test]
    async fn signed_zero_coordinates_merge() {
        let search = MockVenues::new(|_, _| {
            Ok(vec![venue("Edge Bar", -0.0, 0.5), venue("Edge Bar", 0.0, 0.5)])
        });
        let region = square(0.0, 0.5, 1.0);

        let result = PoiDiscovery::new(&search, 50).discover(&region, &coffee()).await;

        assert_eq!(result.venues.len(), 1);
    }

    #[tokio::test]
    async fn nearby_but_distinct_venues_are_kept() {
        let search = MockVenues::new(|_, point| {
            Ok(vec![venue("Chain Café", point.lng, point.lat)])
        });
        let region = square(0.5, 0.5, 1.0);

        let result = PoiDiscovery::new(&search, 50).discover(&region, &coffee()).await;

        assert_eq!(result.venues.len(), 5);
    }

    #[tokio::test]
    async fn capped_in_discovery_order() {
        let search = MockVenues::new(|_, point| {
            Ok((0..4)
                .map(|i| venue(&format!("v{i}"), point.lng, point.lat))
                .collect())
        });
        let region = square(0.5, 0.5, 1.0);

        let result = PoiDiscovery::new(&search, 6).discover(&region, &coffee()).await;

        assert_eq!(result.venues.len(), 6);
        // The centroid's four come first, then the SW point's.
        assert!(result.venues[..4].iter().all(|v| near_center(v.position)));
        assert_eq!(result.venues[4].position, Position::new(0.25, 0.25));
    }

    #[tokio::test]
    async fn failed_point_is_absorbed() {
        let search = MockVenues::new(|_, point| {
            if near_center(point) {
                Err(ProviderError::Api {
                    status: 500,
                    message: "boom".into(),
                })
            } else {
                Ok(vec![venue("Quadrant", point.lng, point.lat)])
            }
        });
        let region = square(0.5, 0.5, 1.0);

        let result = PoiDiscovery::new(&search, 50).discover(&region, &coffee()).await;

        assert_eq!(result.venues.len(), 4);
        assert_eq!(result.failed_queries, 1);
    }

    #[tokio::test]
    async fn all_points_failing_is_empty_not_error() {
        let search = MockVenues::new(|_, _| Err(ProviderError::Unauthorized));
        let region = square(0.5, 0.5, 1.0);

        let result = PoiDiscovery::new(&search, 50).discover(&region, &coffee()).await;

        assert!(result.venues.is_empty());
        assert_eq!(result.queries, 5);
        assert_eq!(result.failed_queries, 5);
    }

    #[tokio::test]
    async fn categories_tag_results_and_share_ids() {
        // The same provider id comes back for both categories at a point.
        let search = MockVenues::new(|query, _| {
            let mut v = venue("Hybrid", 0.5, 0.5);
            v.id = "hybrid".into();
            let mut other = venue(query, 0.4, 0.4);
            other.id = query.to_string();
            Ok(vec![v, other])
        });
        let region = square(0.5, 0.5, 1.0);

        let result = PoiDiscovery::new(&search, 50)
            .discover(&region, &PoiCategory::resolve(["beer", "meal"]))
            .await;

        let hybrid = result
            .venues
            .iter()
            .find(|v| v.display_name == "Hybrid")
            .unwrap();
        assert_eq!(hybrid.source_category, "beer");

        let restaurant = result
            .venues
            .iter()
            .find(|v| v.display_name == "restaurant")
            .unwrap();
        assert_eq!(restaurant.source_category, "meal");
    }

    #[tokio::test]
    async fn no_categories_means_no_queries() {
        let search = MockVenues::new(|_, _| Ok(vec![venue("x", 0.5, 0.5)]));
        let region = square(0.5, 0.5, 1.0);

        let result = PoiDiscovery::new(&search, 50).discover(&region, &[]).await;

        assert_eq!(result, DiscoveryResult::default());
        assert!(search.calls().is_empty());
    }
}
