//! Trip planner endpoint.

use actix_web::{HttpResponse, web};

use mumii_core::domain::{Itinerary, ItineraryPreferences};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/itinerary
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<ItineraryPreferences>,
) -> AppResult<HttpResponse> {
    let itinerary = Itinerary::plan(body.into_inner(), state.catalog.restaurants())?;

    tracing::debug!(
        itinerary_id = %itinerary.id,
        days = itinerary.recommendations.len(),
        "Itinerary planned"
    );
    Ok(HttpResponse::Ok().json(itinerary))
}
