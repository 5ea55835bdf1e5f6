//! Domain entities - the core business objects.

mod cache_entry;
mod challenge;
mod itinerary;
mod restaurant;
mod user;

pub use cache_entry::ApiCacheEntry;
pub use challenge::{Challenge, ChallengeStatus};
pub use itinerary::{CachedItinerary, DayPlan, Itinerary, ItineraryPreferences, MAX_DURATION_DAYS};
pub use restaurant::{CachedRestaurant, Restaurant, RestaurantFilter};
pub use user::{FavoriteChange, NewUser, User, avatar_for};
