//! Great-circle geometry over latitude/longitude points.

use serde::{Deserialize, Serialize};

/// Mean earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine distance to another point, in nautical miles.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();
        let a = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_NM * c
    }

    /// Initial great-circle bearing toward another point, in degrees
    /// [0, 360).
    pub fn bearing_to(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlon = (other.lon - self.lon).to_radians();
        let y = dlon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
        (y.atan2(x).to_degrees() + 360.0) % 360.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_degree_of_latitude_is_sixty_miles() {
        let d = GeoPoint::new(0.0, 0.0).distance_to(&GeoPoint::new(1.0, 0.0));
        assert!((d - 60.04).abs() < 0.05, "got {d}");
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = GeoPoint::new(40.64, -73.78);
        assert!(p.distance_to(&p).abs() < 1e-9);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(40.64, -73.78);
        let b = GeoPoint::new(40.78, -73.87);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert!((origin.bearing_to(&GeoPoint::new(1.0, 0.0)) - 0.0).abs() < 1e-6);
        assert!((origin.bearing_to(&GeoPoint::new(0.0, 1.0)) - 90.0).abs() < 1e-6);
        assert!((GeoPoint::new(1.0, 0.0).bearing_to(&origin) - 180.0).abs() < 1e-6);
        assert!((GeoPoint::new(0.0, 1.0).bearing_to(&origin) - 270.0).abs() < 1e-6);
    }

    #[test]
    fn test_bearing_stays_in_range() {
        let b = GeoPoint::new(10.0, 20.0).bearing_to(&GeoPoint::new(-5.0, -40.0));
        assert!((0.0..360.0).contains(&b));
    }
}
