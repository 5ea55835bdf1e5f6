//! Static demo catalog of Hanoi restaurants and food challenges.

use mumii_core::domain::{Challenge, ChallengeStatus, Restaurant, RestaurantFilter};
use mumii_core::geo::Coordinates;

/// Read-only restaurant and challenge data served by the API.
#[derive(Debug, Clone)]
pub struct MockCatalog {
    restaurants: Vec<Restaurant>,
    challenges: Vec<Challenge>,
}

impl MockCatalog {
    pub fn new(restaurants: Vec<Restaurant>, challenges: Vec<Challenge>) -> Self {
        Self {
            restaurants,
            challenges,
        }
    }

    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    pub fn restaurant(&self, id: &str) -> Option<&Restaurant> {
        self.restaurants.iter().find(|r| r.id == id)
    }

    /// Restaurants matching a filter, in catalog order.
    pub fn search(&self, filter: &RestaurantFilter) -> Vec<Restaurant> {
        filter.apply(&self.restaurants).into_iter().cloned().collect()
    }

    /// Challenges with the given status, or all of them.
    pub fn challenges(&self, status: Option<ChallengeStatus>) -> Vec<Challenge> {
        self.challenges
            .iter()
            .filter(|c| status.is_none_or(|s| s.matches(c)))
            .cloned()
            .collect()
    }

    pub fn challenge(&self, id: &str) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id == id)
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new(default_restaurants(), default_challenges())
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn default_restaurants() -> Vec<Restaurant> {
    vec![
        Restaurant {
            id: "1".to_string(),
            name: "Bánh Mì Phượng".to_string(),
            cuisine: "Vietnamese Street Food".to_string(),
            rating: 4.8,
            review_count: 1250,
            price_range: "20,000 - 40,000 VND".to_string(),
            coordinates: Coordinates::new(21.0285, 105.8542),
            distance: "0.3 km".to_string(),
            is_hidden_gem: false,
            mood: strings(&["quick", "casual"]),
            tags: strings(&["street-food", "banh-mi", "local-favorite"]),
        },
        Restaurant {
            id: "2".to_string(),
            name: "Cơm Tấm Sài Gòn".to_string(),
            cuisine: "Vietnamese".to_string(),
            rating: 4.6,
            review_count: 890,
            price_range: "50,000 - 100,000 VND".to_string(),
            coordinates: Coordinates::new(21.0245, 105.8412),
            distance: "0.8 km".to_string(),
            is_hidden_gem: true,
            mood: strings(&["comfort", "traditional"]),
            tags: strings(&["com-tam", "grilled-pork", "authentic"]),
        },
        Restaurant {
            id: "3".to_string(),
            name: "Phở Gà Nghĩa Tân".to_string(),
            cuisine: "Noodle Soup".to_string(),
            rating: 4.7,
            review_count: 640,
            price_range: "40,000 - 60,000 VND".to_string(),
            coordinates: Coordinates::new(21.0375, 105.8485),
            distance: "1.2 km".to_string(),
            is_hidden_gem: true,
            mood: strings(&["comfort", "breakfast"]),
            tags: strings(&["pho", "chicken", "local-favorite"]),
        },
    ]
}

fn default_challenges() -> Vec<Challenge> {
    vec![
        Challenge {
            id: "1".to_string(),
            title: "Time Travel: Hanoi 1960s".to_string(),
            description: "Visit traditional restaurants that have been serving the same recipes since the 1960s".to_string(),
            kind: "time-travel".to_string(),
            difficulty: "medium".to_string(),
            duration: "2-3 hours".to_string(),
            points: 150,
            participants: 4,
            progress: 60,
            is_completed: false,
            location: "Old Quarter, Hanoi".to_string(),
        },
        Challenge {
            id: "2".to_string(),
            title: "Street Food Marathon".to_string(),
            description: "Try five street food stalls in a single evening".to_string(),
            kind: "exploration".to_string(),
            difficulty: "hard".to_string(),
            duration: "4 hours".to_string(),
            points: 250,
            participants: 12,
            progress: 0,
            is_completed: false,
            location: "Hoan Kiem, Hanoi".to_string(),
        },
        Challenge {
            id: "3".to_string(),
            title: "Phở Tasting".to_string(),
            description: "Compare phở bò and phở gà from three different shops".to_string(),
            kind: "tasting".to_string(),
            difficulty: "easy".to_string(),
            duration: "1-2 hours".to_string(),
            points: 100,
            participants: 27,
            progress: 100,
            is_completed: true,
            location: "Ba Dinh, Hanoi".to_string(),
        },
    ]
}
