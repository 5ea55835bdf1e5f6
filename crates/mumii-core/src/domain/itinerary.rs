use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::restaurant::Restaurant;
use crate::error::DomainError;

/// Share of the daily budget a plan is expected to spend.
const SPEND_RATIO: f64 = 0.8;

/// Restaurants suggested per day.
const RESTAURANTS_PER_DAY: usize = 2;

/// Longest trip the planner accepts.
pub const MAX_DURATION_DAYS: u32 = 30;

/// Trip preferences submitted to the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryPreferences {
    /// Daily budget.
    pub budget: f64,
    /// Trip length in days.
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
}

/// One day of a generated plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day: u32,
    pub restaurants: Vec<Restaurant>,
    pub estimated_cost: f64,
    pub theme: String,
}

/// A generated food itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub id: String,
    pub preferences: ItineraryPreferences,
    pub recommendations: Vec<DayPlan>,
    pub total_estimated_cost: f64,
    pub created_at: DateTime<Utc>,
}

impl Itinerary {
    /// Build a plan from preferences, rotating through the catalog day by day.
    pub fn plan(
        preferences: ItineraryPreferences,
        catalog: &[Restaurant],
    ) -> Result<Self, DomainError> {
        if !preferences.budget.is_finite() || preferences.budget < 0.0 {
            return Err(DomainError::Validation(
                "budget must be a non-negative number".to_string(),
            ));
        }
        if preferences.duration == 0 {
            return Err(DomainError::Validation(
                "duration must be at least one day".to_string(),
            ));
        }
        if preferences.duration > MAX_DURATION_DAYS {
            return Err(DomainError::Validation(format!(
                "duration must be at most {MAX_DURATION_DAYS} days"
            )));
        }

        let daily_cost = preferences.budget * SPEND_RATIO;
        let theme = format!(
            "{} dining experience",
            preferences.mood.as_deref().unwrap_or("local")
        );

        let recommendations = (0..preferences.duration)
            .map(|offset| {
                let start = offset as usize * RESTAURANTS_PER_DAY;
                let restaurants = (0..RESTAURANTS_PER_DAY.min(catalog.len()))
                    .map(|k| catalog[(start + k) % catalog.len()].clone())
                    .collect();

                DayPlan {
                    day: offset + 1,
                    restaurants,
                    estimated_cost: daily_cost,
                    theme: theme.clone(),
                }
            })
            .collect();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            total_estimated_cost: daily_cost * f64::from(preferences.duration),
            preferences,
            recommendations,
            created_at: Utc::now(),
        })
    }
}

/// Itinerary saved on the device for offline use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedItinerary {
    pub id: String,
    pub name: String,
    /// Restaurant ids in visiting order.
    pub restaurants: Vec<String>,
    pub budget: f64,
    pub duration: u32,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;

    fn catalog() -> Vec<Restaurant> {
        (1..=3)
            .map(|i| Restaurant {
                id: i.to_string(),
                name: format!("R{i}"),
                cuisine: "Vietnamese".to_string(),
                rating: 4.0,
                review_count: 1,
                price_range: String::new(),
                coordinates: Coordinates::new(21.0, 105.8),
                distance: String::new(),
                is_hidden_gem: false,
                mood: vec![],
                tags: vec![],
            })
            .collect()
    }

    fn preferences(budget: f64, duration: u32) -> ItineraryPreferences {
        ItineraryPreferences {
            budget,
            duration,
            location: Some("Hanoi".to_string()),
            cuisine_type: None,
            group_size: Some(2),
            group_type: None,
            mood: Some("adventurous".to_string()),
        }
    }

    #[test]
    fn test_plan_costs_and_theme() {
        let itinerary = Itinerary::plan(preferences(500_000.0, 2), &catalog()).unwrap();

        assert_eq!(itinerary.recommendations.len(), 2);
        assert_eq!(itinerary.recommendations[0].estimated_cost, 400_000.0);
        assert_eq!(itinerary.total_estimated_cost, 800_000.0);
        assert_eq!(
            itinerary.recommendations[0].theme,
            "adventurous dining experience"
        );
    }

    #[test]
    fn test_plan_rotates_restaurants() {
        let itinerary = Itinerary::plan(preferences(100.0, 2), &catalog()).unwrap();
        let day_ids = |day: usize| -> Vec<String> {
            itinerary.recommendations[day]
                .restaurants
                .iter()
                .map(|r| r.id.clone())
                .collect()
        };

        assert_eq!(day_ids(0), vec!["1", "2"]);
        assert_eq!(day_ids(1), vec!["3", "1"]);
    }

    #[test]
    fn test_plan_with_empty_catalog() {
        let itinerary = Itinerary::plan(preferences(100.0, 1), &[]).unwrap();
        assert!(itinerary.recommendations[0].restaurants.is_empty());
    }

    #[test]
    fn test_plan_rejects_invalid_input() {
        assert!(matches!(
            Itinerary::plan(preferences(-1.0, 1), &catalog()),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            Itinerary::plan(preferences(100.0, 0), &catalog()),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            Itinerary::plan(preferences(100.0, MAX_DURATION_DAYS + 1), &catalog()),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            Itinerary::plan(preferences(1.0, 4_000_000_000), &catalog()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_plan_longest_trip() {
        let itinerary =
            Itinerary::plan(preferences(100.0, MAX_DURATION_DAYS), &catalog()).unwrap();

        assert_eq!(itinerary.recommendations.len(), MAX_DURATION_DAYS as usize);
        let last = itinerary.recommendations.last().unwrap();
        assert_eq!(last.day, MAX_DURATION_DAYS);
        // Slots 58 and 59 wrap to the second and third entries.
        let ids: Vec<_> = last.restaurants.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }
}
