//! Great-circle distance

use dinepick_api::{Location, Restaurant};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two points, in meters.
///
/// Non-finite inputs propagate to the result.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Anything with a position on the globe
pub trait Positioned {
    fn coordinates(&self) -> (f64, f64);

    /// Distance to another position, in meters
    fn distance_to(&self, other: &impl Positioned) -> f64 {
        let (lat1, lon1) = self.coordinates();
        let (lat2, lon2) = other.coordinates();
        distance_meters(lat1, lon1, lat2, lon2)
    }
}

impl Positioned for Location {
    fn coordinates(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

impl Positioned for Restaurant {
    fn coordinates(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS: (f64, f64) = (48.8566, 2.3522);
    const LYON: (f64, f64) = (45.7640, 4.8357);

    #[test]
    fn same_point_is_zero() {
        assert_eq!(distance_meters(PARIS.0, PARIS.1, PARIS.0, PARIS.1), 0.0);
    }

    #[test]
    fn symmetric() {
        let there = distance_meters(PARIS.0, PARIS.1, LYON.0, LYON.1);
        let back = distance_meters(LYON.0, LYON.1, PARIS.0, PARIS.1);
        assert!((there - back).abs() < 1e-6);
    }

    #[test]
    fn paris_to_lyon() {
        let d = distance_meters(PARIS.0, PARIS.1, LYON.0, LYON.1);
        assert!((d - 392_000.0).abs() < 392_000.0 * 0.02, "got {}", d);
    }

    #[test]
    fn nan_propagates() {
        assert!(distance_meters(f64::NAN, 0.0, 0.0, 0.0).is_nan());
    }

    #[test]
    fn restaurant_to_location() {
        let here = Location::new(PARIS.0, PARIS.1);
        let r = Restaurant::new("1", "Bouchon", LYON.0, LYON.1);
        assert!((r.distance_to(&here) - here.distance_to(&r)).abs() < 1e-6);
    }
}
