//! Geographical primitives shared by the observation and locator components.

use haversine::{distance, Location as HaversineLocation, Units};

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are decimal degrees as `f64`.
///
/// # Examples
///
/// ```
/// use wuwatch::LatLon;
///
/// let frederick_md = LatLon(39.4143, -77.4105);
/// assert_eq!(frederick_md.0, 39.4143); // Latitude
/// assert_eq!(frederick_md.1, -77.4105); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    /// Great-circle distance to `other` in kilometers.
    pub fn distance_km(&self, other: &LatLon) -> f64 {
        distance(self.to_haversine(), other.to_haversine(), Units::Kilometers)
    }

    /// Great-circle distance to `other` in miles.
    pub fn distance_mi(&self, other: &LatLon) -> f64 {
        distance(self.to_haversine(), other.to_haversine(), Units::Miles)
    }

    fn to_haversine(&self) -> HaversineLocation {
        HaversineLocation {
            latitude: self.0,
            longitude: self.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_zero_for_same_point() {
        let p = LatLon(39.4143, -77.4105);
        assert!(p.distance_km(&p).abs() < 1e-9);
        assert!(p.distance_mi(&p).abs() < 1e-9);
    }

    #[test]
    fn km_and_miles_are_consistent() {
        let a = LatLon(39.4143, -77.4105);
        let b = LatLon(39.0458, -76.6413); // Baltimore
        let km = a.distance_km(&b);
        let mi = a.distance_mi(&b);
        assert!(km > 0.0);
        // 1 mile = 1.609344 km
        assert!((km / mi - 1.609344).abs() < 1e-3);
    }
}
