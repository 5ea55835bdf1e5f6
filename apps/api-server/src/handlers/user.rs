//! User profile and favorites - all routes require a bearer token.

use actix_web::{HttpResponse, web};

use mumii_core::domain::FavoriteChange;
use mumii_core::error::RepoError;
use mumii_shared::dto::{FavoriteRequest, FavoritesResponse, ProfileResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn user_not_found(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound => AppError::not_found("User not found"),
        other => other.into(),
    }
}

/// GET /api/user/profile
pub async fn profile(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(&identity.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(HttpResponse::Ok().json(ProfileResponse::from(user)))
}

/// POST /api/user/favorites
pub async fn add_favorite(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<FavoriteRequest>,
) -> AppResult<HttpResponse> {
    let restaurant_id = body
        .into_inner()
        .restaurant_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::bad_request("restaurantId is required"))?;

    let favorites = state
        .users
        .update_favorites(&identity.user_id, FavoriteChange::Add(restaurant_id))
        .await
        .map_err(user_not_found)?;

    Ok(HttpResponse::Ok().json(FavoritesResponse {
        message: "Restaurant added to favorites".to_string(),
        favorites,
    }))
}

/// DELETE /api/user/favorites/{restaurant_id}
pub async fn remove_favorite(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let favorites = state
        .users
        .update_favorites(&identity.user_id, FavoriteChange::Remove(path.into_inner()))
        .await
        .map_err(user_not_found)?;

    Ok(HttpResponse::Ok().json(FavoritesResponse {
        message: "Restaurant removed from favorites".to_string(),
        favorites,
    }))
}
