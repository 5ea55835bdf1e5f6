//! # Mumii Shared
//!
//! Wire types shared by the API server and the offline-first client.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
