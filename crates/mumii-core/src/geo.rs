//! Coordinates, distance math, and geolocation samples.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per degree used by the planar approximation.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Great-circle distance in meters (haversine).
pub fn haversine_distance(a: Coordinates, b: Coordinates) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Planar distance in meters treating one degree of either axis as 111 km.
///
/// Only meaningful for short distances near the equator; longitude error
/// grows with latitude.
pub fn flat_distance(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (a.lat - b.lat).abs();
    let d_lng = (a.lng - b.lng).abs();
    (d_lat * d_lat + d_lng * d_lng).sqrt() * METERS_PER_DEGREE
}

/// One position fix from the platform watcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoSample {
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy radius in meters.
    pub accuracy: f64,
    /// Capture time, milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl GeoSample {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// A fixed location that triggers an alert when entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinates,
    pub radius_m: f64,
}

impl PointOfInterest {
    pub fn new(id: &str, name: &str, lat: f64, lng: f64, radius_m: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            coordinates: Coordinates::new(lat, lng),
            radius_m,
        }
    }
}

/// Options handed to the platform position watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    /// How long a single acquisition may take.
    pub timeout: Duration,
    /// How old a cached fix may be before a fresh one is required.
    pub maximum_age: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(60),
        }
    }
}

/// Position acquisition failures. Non-fatal: the watcher keeps trying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("Location access denied by user")]
    PermissionDenied,

    #[error("Location information is unavailable")]
    PositionUnavailable,

    #[error("Location request timed out")]
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOAN_KIEM: Coordinates = Coordinates::new(21.0285, 105.8542);

    #[test]
    fn test_haversine_zero_for_same_point() {
        assert!(haversine_distance(HOAN_KIEM, HOAN_KIEM).abs() < 1e-6);
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let d = haversine_distance(Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 0.0));
        // 2 * pi * R / 360
        assert!((d - 111_194.93).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let other = Coordinates::new(21.05, 105.90);
        let d1 = haversine_distance(HOAN_KIEM, other);
        let d2 = haversine_distance(other, HOAN_KIEM);
        assert!((d1 - d2).abs() < 1e-6);
        assert!(d1 > 3_000.0 && d1 < 6_000.0, "got {d1}");
    }

    #[test]
    fn test_flat_distance_uses_degree_multiplier() {
        let d = flat_distance(Coordinates::new(0.0, 0.0), Coordinates::new(0.003, 0.004));
        assert!((d - 555.0).abs() < 1e-6, "got {d}");
    }

    #[test]
    fn test_default_watch_options() {
        let options = WatchOptions::default();
        assert!(options.high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.maximum_age, Duration::from_secs(60));
    }

    #[test]
    fn test_geolocation_error_messages() {
        assert_eq!(
            GeolocationError::PermissionDenied.to_string(),
            "Location access denied by user"
        );
        assert_eq!(
            GeolocationError::PositionUnavailable.to_string(),
            "Location information is unavailable"
        );
        assert_eq!(GeolocationError::Timeout.to_string(), "Location request timed out");
    }
}
