//! Folding per-traveler isochrones into one overlap region.

use std::borrow::Borrow;

use crate::domain::Region;
use crate::geometry::intersect;

/// Intersect all regions.
///
/// - no regions: `None`
/// - one region: that region, unchanged
/// - several: left fold over [`intersect`], stopping at the first empty
///   intermediate result
///
/// Intersection is associative and commutative, so any evaluation order
/// gives the same region; only the early stop matters for cost. Callers
/// that have fewer isochrones than travelers must not call this at all:
/// that is missing data, not an empty overlap.
pub fn reduce<I, R>(regions: I) -> Option<Region>
where
    I: IntoIterator<Item = R>,
    R: Borrow<Region>,
{
    let mut iter = regions.into_iter();
    let first = iter.next()?.borrow().clone();

    iter.try_fold(first, |acc, next| intersect(&acc, next.borrow()))
}
