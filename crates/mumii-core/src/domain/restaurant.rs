use serde::{Deserialize, Serialize};

use crate::geo::{Coordinates, haversine_distance};

/// Restaurant as served by the catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    pub rating: f64,
    pub review_count: u32,
    pub price_range: String,
    pub coordinates: Coordinates,
    /// Display label, e.g. "0.3 km".
    pub distance: String,
    pub is_hidden_gem: bool,
    pub mood: Vec<String>,
    pub tags: Vec<String>,
}

/// Restaurant snapshot kept in the offline cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedRestaurant {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    pub location: String,
    pub rating: f64,
    pub price_range: String,
    pub coordinates: Coordinates,
    pub image: String,
    pub description: String,
    pub features: Vec<String>,
    pub hours: String,
    /// Set once the record has been persisted for offline use.
    #[serde(default)]
    pub cached: bool,
}

/// Catalog query: every present criterion must match.
#[derive(Debug, Clone, Default)]
pub struct RestaurantFilter {
    pub mood: Option<String>,
    pub cuisine: Option<String>,
    /// Center and radius in meters.
    pub near: Option<(Coordinates, f64)>,
}

impl RestaurantFilter {
    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        let mood_ok = match self.mood.as_deref() {
            None | Some("all") => true,
            Some(mood) => restaurant.mood.iter().any(|m| m == mood),
        };

        let cuisine_ok = self.cuisine.as_deref().is_none_or(|cuisine| {
            restaurant
                .cuisine
                .to_lowercase()
                .contains(&cuisine.to_lowercase())
        });

        let near_ok = self.near.is_none_or(|(center, radius)| {
            haversine_distance(center, restaurant.coordinates) <= radius
        });

        mood_ok && cuisine_ok && near_ok
    }

    /// Filter a catalog slice, preserving order.
    pub fn apply<'a>(&self, restaurants: &'a [Restaurant]) -> Vec<&'a Restaurant> {
        restaurants.iter().filter(|r| self.matches(r)).collect()
    }
}
