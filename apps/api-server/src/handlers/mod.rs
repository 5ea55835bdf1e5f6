//! HTTP handlers and route configuration.

mod auth;
mod challenges;
mod health;
mod itinerary;
mod nearby;
mod notifications;
mod restaurants;
mod social;
mod user;

use actix_web::{HttpResponse, web};

use crate::middleware::error::AppError;

/// Configure all application routes, extractor error handling and the
/// JSON 404 fallback.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::malformed("Invalid request body", err).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::malformed("Invalid query string", err).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::malformed("Invalid path", err).into()
    }))
    .service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/restaurants", web::get().to(restaurants::list))
            .route("/restaurants/{id}", web::get().to(restaurants::get))
            .route("/itinerary", web::post().to(itinerary::create))
            .route("/challenges", web::get().to(challenges::list))
            .route("/challenges/{id}/join", web::post().to(challenges::join))
            .route("/nearby", web::post().to(nearby::nearby))
            .service(
                web::scope("/notifications")
                    .route("/subscribe", web::post().to(notifications::subscribe))
                    .route("/send", web::post().to(notifications::send)),
            )
            .route("/social/share", web::post().to(social::share))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/signup", web::post().to(auth::signup))
                    .route("/signin", web::post().to(auth::signin)),
            )
            // Protected routes
            .service(
                web::scope("/user")
                    .route("/profile", web::get().to(user::profile))
                    .route("/favorites", web::post().to(user::add_favorite))
                    .route(
                        "/favorites/{restaurant_id}",
                        web::delete().to(user::remove_favorite),
                    ),
            ),
    )
    .default_service(web::to(route_not_found));
}

async fn route_not_found() -> HttpResponse {
    use actix_web::ResponseError;

    AppError::not_found("Route not found").error_response()
}
