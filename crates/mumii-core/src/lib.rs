//! # Mumii Core
//!
//! The domain layer of Mumii.
//! Restaurants, challenges, itineraries, users, geofencing, and the ports
//! that infrastructure implements. No I/O lives here.

pub mod domain;
pub mod error;
pub mod geo;
pub mod geofence;
pub mod ports;

pub use error::DomainError;
