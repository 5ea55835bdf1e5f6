//! Restaurant catalog endpoints.

use actix_web::{HttpResponse, web};

use mumii_core::domain::RestaurantFilter;
use mumii_core::geo::Coordinates;
use mumii_shared::dto::{RestaurantQuery, RestaurantsResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// The radius filter applies only when `lat`, `lng` and `radius` are all given.
fn filter_from(query: RestaurantQuery) -> RestaurantFilter {
    let near = match (query.lat, query.lng, query.radius) {
        (Some(lat), Some(lng), Some(radius)) => Some((Coordinates::new(lat, lng), radius)),
        _ => None,
    };

    RestaurantFilter {
        mood: query.mood,
        cuisine: query.cuisine,
        near,
    }
}

/// GET /api/restaurants?mood&cuisine&radius&lat&lng
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<RestaurantQuery>,
) -> AppResult<HttpResponse> {
    let filter = filter_from(query.into_inner());
    let restaurants = state.catalog.search(&filter);

    tracing::debug!(total = restaurants.len(), "Listing restaurants");
    Ok(HttpResponse::Ok().json(RestaurantsResponse::from(restaurants)))
}

/// GET /api/restaurants/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let restaurant = state
        .catalog
        .restaurant(&id)
        .ok_or_else(|| AppError::not_found("Restaurant not found"))?;

    Ok(HttpResponse::Ok().json(restaurant))
}
