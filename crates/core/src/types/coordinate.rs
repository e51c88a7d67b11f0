//! Geographic coordinates and geodesic distance.
//!
//! Distances are measured on the WGS-84 ellipsoid using Karney's geodesic
//! algorithm from the `geo` crate, which converges for every pair of points
//! (including near-antipodal ones where Vincenty's iteration can fail).

use geo::{GeodesicDistance, Point};
use serde::{Deserialize, Serialize};

/// Meters in one international statute mile.
pub const METERS_PER_MILE: f64 = 1609.344;

/// Errors that can occur when constructing a [`Coordinate`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    /// Latitude is not a finite number in `-90..=90`.
    #[error("latitude must be between -90 and 90 (got {0})")]
    Latitude(f64),
    /// Longitude is not a finite number in `-180..=180`.
    #[error("longitude must be between -180 and 180 (got {0})")]
    Longitude(f64),
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Create a coordinate from latitude and longitude in degrees.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is not finite or is out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Geodesic distance to `other` in meters.
    #[must_use]
    pub fn distance_meters(&self, other: &Self) -> f64 {
        self.to_point().geodesic_distance(&other.to_point())
    }

    /// Geodesic distance to `other` in statute miles.
    #[must_use]
    pub fn distance_miles(&self, other: &Self) -> f64 {
        self.distance_meters(other) / METERS_PER_MILE
    }

    /// `geo` points are (x, y), i.e. (longitude, latitude).
    pub(crate) fn to_point(self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }

    #[cfg(test)]
    pub(crate) fn from_point(point: Point<f64>) -> Result<Self, CoordinateError> {
        Self::new(point.y(), point.x())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use geo::GeodesicDestination;

    use super::*;

    #[test]
    fn test_new_validates_ranges() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert_eq!(
            Coordinate::new(90.5, 0.0),
            Err(CoordinateError::Latitude(90.5))
        );
        assert_eq!(
            Coordinate::new(0.0, -180.1),
            Err(CoordinateError::Longitude(-180.1))
        );
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let sf = Coordinate::new(37.77, -122.41).unwrap();
        assert!(sf.distance_miles(&sf).abs() < 1e-9);
    }

    #[test]
    fn test_distance_short_hop() {
        let a = Coordinate::new(37.77, -122.41).unwrap();
        let b = Coordinate::new(37.78, -122.42).unwrap();
        let miles = a.distance_miles(&b);
        assert!((0.8..1.0).contains(&miles), "got {miles}");
    }

    #[test]
    fn test_distance_cross_country() {
        let sf = Coordinate::new(37.77, -122.41).unwrap();
        let nyc = Coordinate::new(40.71, -74.00).unwrap();
        let miles = sf.distance_miles(&nyc);
        assert!((2550.0..2590.0).contains(&miles), "got {miles}");
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinate::new(51.5, -0.12).unwrap();
        let b = Coordinate::new(48.85, 2.35).unwrap();
        assert!((a.distance_meters(&b) - b.distance_meters(&a)).abs() < 1e-6);
    }

    #[test]
    fn test_point_uses_lon_lat_order() {
        let c = Coordinate::new(10.0, 20.0).unwrap();
        let p = c.to_point();
        assert!((p.x() - 20.0).abs() < f64::EPSILON);
        assert!((p.y() - 10.0).abs() < f64::EPSILON);
        assert_eq!(Coordinate::from_point(p).unwrap(), c);
    }

    #[test]
    fn test_destination_round_trips_distance() {
        let origin = Coordinate::new(37.77, -122.41).unwrap();
        let point = origin
            .to_point()
            .geodesic_destination(45.0, 3.0 * METERS_PER_MILE);
        let dest = Coordinate::from_point(point).unwrap();
        assert!((origin.distance_miles(&dest) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Coordinate =
            serde_json::from_str(r#"{"latitude": 37.77, "longitude": -122.41}"#).unwrap();
        assert!((ok.latitude() - 37.77).abs() < f64::EPSILON);
        assert!(
            serde_json::from_str::<Coordinate>(r#"{"latitude": 137.0, "longitude": 0.0}"#)
                .is_err()
        );
    }
}
