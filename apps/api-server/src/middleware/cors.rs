//! CORS policy for the browser frontend.

use actix_cors::Cors;
use actix_web::http::{Method, header};

use crate::config::AppConfig;

/// Allow the configured frontend origin, with credentials, on the methods
/// and headers the API uses.
pub fn cors(config: &AppConfig) -> Cors {
    Cors::default()
        .allowed_origin(&config.frontend_url)
        .allowed_methods([Method::GET, Method::POST, Method::DELETE])
        .allowed_headers([
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([header::HeaderName::from_static("x-request-id")])
        .supports_credentials()
        .max_age(3600_usize)
}
