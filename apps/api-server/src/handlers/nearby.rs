//! Nearby restaurant search.

use actix_web::{HttpResponse, web};

use mumii_core::geo::{Coordinates, flat_distance};
use mumii_shared::dto::{NearbyRequest, NearbyResponse, UserLocation};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/nearby
///
/// Uses the flat degree-to-meter approximation, which overestimates
/// east-west distances away from the equator.
pub async fn nearby(
    state: web::Data<AppState>,
    body: web::Json<NearbyRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if !req.radius.is_finite() || req.radius < 0.0 {
        return Err(AppError::bad_request("radius must be a non-negative number"));
    }

    let origin = Coordinates::new(req.latitude, req.longitude);
    let restaurants = state
        .catalog
        .restaurants()
        .iter()
        .filter(|r| flat_distance(origin, r.coordinates) <= req.radius)
        .cloned()
        .collect();

    Ok(HttpResponse::Ok().json(NearbyResponse {
        restaurants,
        user_location: UserLocation {
            latitude: req.latitude,
            longitude: req.longitude,
        },
        search_radius: req.radius,
    }))
}
