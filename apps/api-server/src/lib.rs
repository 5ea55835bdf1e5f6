//! # Mumii API Server
//!
//! Actix-web service exposing the demo restaurant catalog, challenges,
//! trip planning, nearby search, and account auth with favorites.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;

pub use config::AppConfig;
pub use state::AppState;
