//! Health check endpoint.

use actix_web::HttpResponse;

use mumii_shared::dto::HealthResponse;

/// GET /api/health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "OK".to_string(),
        message: "API service is running".to_string(),
        timestamp: chrono::Utc::now(),
    })
}
