//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use mumii_core::domain::{Challenge, Restaurant, User};
use serde::{Deserialize, Serialize};

/// GET /api/health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Request to register a new user. Fields are optional so that a missing
/// field is reported as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request to sign in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A user's public profile fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorites: Option<Vec<String>>,
}

impl PublicUser {
    /// Profile without the favorites list.
    pub fn summary(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            favorites: None,
        }
    }

    pub fn with_favorites(user: &User) -> Self {
        Self {
            favorites: Some(user.favorites.clone()),
            ..Self::summary(user)
        }
    }
}

/// 201 response to a signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    pub message: String,
    pub user: PublicUser,
}

/// Response to a successful signin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninResponse {
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

/// GET /api/user/profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar: String,
    pub favorites: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            avatar: user.avatar,
            favorites: user.favorites,
            created_at: user.created_at,
        }
    }
}

/// POST /api/user/favorites
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub restaurant_id: Option<String>,
}

/// Updated favorites after an add or remove.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesResponse {
    pub message: String,
    pub favorites: Vec<String>,
}

/// Query string of GET /api/restaurants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    /// Search radius in meters; only applied together with `lat` and `lng`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantsResponse {
    pub restaurants: Vec<Restaurant>,
    pub total: usize,
}

impl From<Vec<Restaurant>> for RestaurantsResponse {
    fn from(restaurants: Vec<Restaurant>) -> Self {
        Self {
            total: restaurants.len(),
            restaurants,
        }
    }
}

/// Query string of GET /api/challenges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChallengeQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengesResponse {
    pub challenges: Vec<Challenge>,
    pub total: usize,
}

impl From<Vec<Challenge>> for ChallengesResponse {
    fn from(challenges: Vec<Challenge>) -> Self {
        Self {
            total: challenges.len(),
            challenges,
        }
    }
}

/// POST /api/challenges/{id}/join
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinChallengeRequest {
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinChallengeResponse {
    pub success: bool,
    pub message: String,
    pub challenge_id: String,
}

/// Default search radius of POST /api/nearby, in meters.
pub const DEFAULT_NEARBY_RADIUS: f64 = 1000.0;

fn default_nearby_radius() -> f64 {
    DEFAULT_NEARBY_RADIUS
}

/// POST /api/nearby
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_nearby_radius")]
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyResponse {
    pub restaurants: Vec<Restaurant>,
    pub user_location: UserLocation,
    pub search_radius: f64,
}

/// POST /api/notifications/subscribe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    /// Opaque push subscription as produced by the browser.
    pub subscription: serde_json::Value,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// POST /api/notifications/send
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// POST /api/social/share
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
    pub platform: String,
    pub timestamp: DateTime<Utc>,
}

/// Generic acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

impl AckResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearby_radius_defaults() {
        let req: NearbyRequest =
            serde_json::from_str(r#"{"latitude": 21.0, "longitude": 105.8}"#).unwrap();
        assert_eq!(req.radius, DEFAULT_NEARBY_RADIUS);
    }

    #[test]
    fn test_signup_missing_fields_parse() {
        let req: SignupRequest = serde_json::from_str(r#"{"email": "a@b.c"}"#).unwrap();
        assert!(req.name.is_none());
        assert!(req.password.is_none());
    }

    #[test]
    fn test_summary_omits_favorites() {
        let user = PublicUser {
            id: "1".to_string(),
            email: "a@b.c".to_string(),
            name: "A".to_string(),
            avatar: String::new(),
            favorites: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("favorites").is_none());
    }
}
