//! Point-of-interest categories offered to users.
//!
//! Each category maps a stable id (what users select and what share tokens
//! carry) to the query term the venue search provider understands.

use serde::Serialize;

/// A selectable venue category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoiCategory {
    /// Stable id (e.g. "meal")
    pub id: &'static str,

    /// Display label
    pub label: &'static str,

    /// Provider category query (e.g. "restaurant")
    pub query: &'static str,
}

/// All categories, in display order.
pub const POI_CATEGORIES: [PoiCategory; 6] = [
    PoiCategory {
        id: "coffee",
        label: "Coffee",
        query: "coffee",
    },
    PoiCategory {
        id: "meal",
        label: "Meal",
        query: "restaurant",
    },
    PoiCategory {
        id: "beer",
        label: "Beer",
        query: "bar",
    },
    PoiCategory {
        id: "drink",
        label: "Drink",
        query: "food_and_drink",
    },
    PoiCategory {
        id: "dance",
        label: "Dance",
        query: "nightlife",
    },
    PoiCategory {
        id: "shop",
        label: "Shop",
        query: "shopping",
    },
];

/// Categories selected when a scenario does not say otherwise.
pub const DEFAULT_POI_CATEGORIES: [&str; 3] = ["coffee", "meal", "beer"];

impl PoiCategory {
    /// Look up a category by id.
    pub fn find(id: &str) -> Option<&'static PoiCategory> {
        POI_CATEGORIES.iter().find(|c| c.id == id)
    }

    /// Resolve ids to categories, skipping unknown ones and keeping order.
    pub fn resolve<'a, I>(ids: I) -> Vec<&'static PoiCategory>
    where
        I: IntoIterator<Item = &'a str>,
    {
        ids.into_iter().filter_map(PoiCategory::find).collect()
    }
}
