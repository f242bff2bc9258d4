//! Coordinates, bounding boxes and great-circle distance.
//!
//! Proximity search runs in two steps: a cheap rectangular pre-filter
//! ([`BoundingBox`]) that the database can evaluate with plain comparisons,
//! followed by the exact distance ([`GeoPoint::distance_km`]) which both
//! re-filters to the true radius and provides the sort key.
//!
//! Neither step handles the poles or the ±180° meridian specially. A box
//! centered there can be too wide or can miss points across the meridian.

use serde::{Deserialize, Serialize};

use crate::error::GeoError;

/// Mean Earth radius used for distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers spanned by one degree of latitude.
pub const KM_PER_DEGREE_LAT: f64 = 111.045;

/// A validated latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Build a point, rejecting non-finite or out-of-range coordinates.
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::InvalidLatitude(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(GeoError::InvalidLongitude(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Great-circle distance in kilometers (spherical law of cosines).
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        distance_km(self.lat, self.lng, other.lat, other.lng)
    }
}

/// Great-circle distance between two coordinate pairs, in kilometers.
///
/// Computes `6371 * acos(cos φ1 cos φ2 cos Δλ + sin φ1 sin φ2)`. The cosine
/// is clamped to [-1, 1] so identical points give 0 instead of NaN.
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lng2 - lng1).to_radians();

    let cosine = phi1.cos() * phi2.cos() * delta_lambda.cos() + phi1.sin() * phi2.sin();

    EARTH_RADIUS_KM * cosine.clamp(-1.0, 1.0).acos()
}

/// Validate a search radius in kilometers.
pub fn validate_radius(radius_km: f64) -> Result<f64, GeoError> {
    if radius_km.is_finite() && radius_km > 0.0 {
        Ok(radius_km)
    } else {
        Err(GeoError::InvalidRadius(radius_km))
    }
}

/// Approximate rectangle enclosing a circle of `radius_km` around a center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Box spanning `radius / 111.045` degrees of latitude and the same
    /// distance in longitude, widened by `1 / cos(lat)`.
    pub fn around(center: &GeoPoint, radius_km: f64) -> Self {
        let lat_delta = radius_km / KM_PER_DEGREE_LAT;
        let lng_delta = radius_km / (KM_PER_DEGREE_LAT * center.lat.to_radians().cos());

        Self {
            min_lat: center.lat - lat_delta,
            max_lat: center.lat + lat_delta,
            min_lng: center.lng - lng_delta,
            max_lng: center.lng + lng_delta,
        }
    }

    /// Whether a point lies inside the box (edges inclusive). Mirrors the
    /// `latitude BETWEEN ? AND ? AND longitude BETWEEN ? AND ?` prefilter.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lng..=self.max_lng).contains(&lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_validation() {
        assert!(GeoPoint::new(0.0, 0.0).is_ok());
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());

        assert_eq!(
            GeoPoint::new(90.5, 0.0),
            Err(GeoError::InvalidLatitude(90.5))
        );
        assert_eq!(
            GeoPoint::new(0.0, -180.1),
            Err(GeoError::InvalidLongitude(-180.1))
        );
        assert!(matches!(
            GeoPoint::new(f64::NAN, 0.0),
            Err(GeoError::InvalidLatitude(_))
        ));
        assert!(matches!(
            GeoPoint::new(0.0, f64::INFINITY),
            Err(GeoError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn test_distance_same_point_is_zero() {
        let p = GeoPoint::new(48.8566, 2.3522).unwrap();
        let d = p.distance_km(&p);
        assert!(!d.is_nan());
        assert!(d.abs() < 1e-6);
    }

    #[test]
    fn test_distance_known_pairs() {
        // Paris -> London
        let d = distance_km(48.8566, 2.3522, 51.5074, -0.1278);
        assert!((d - 343.5).abs() < 1.0, "got {d}");

        // One degree of longitude on the equator
        let d = distance_km(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111.19).abs() < 0.05, "got {d}");

        // Antipodes
        let d = distance_km(0.0, 0.0, 0.0, 180.0);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = distance_km(40.7128, -74.0060, 34.0522, -118.2437);
        let b = distance_km(34.0522, -118.2437, 40.7128, -74.0060);
        assert!((a - b).abs() < 1e-9);
        assert!((a - 3936.0).abs() < 10.0, "got {a}");
    }

    #[test]
    fn test_bounding_box_equator() {
        let center = GeoPoint::new(0.0, 0.0).unwrap();
        let bbox = BoundingBox::around(&center, 111.045);
        assert!((bbox.max_lat - 1.0).abs() < 1e-9);
        assert!((bbox.min_lat + 1.0).abs() < 1e-9);
        assert!((bbox.max_lng - 1.0).abs() < 1e-9);
        assert!((bbox.min_lng + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounding_box_widens_with_latitude() {
        let center = GeoPoint::new(60.0, 10.0).unwrap();
        let bbox = BoundingBox::around(&center, 111.045);
        // cos(60°) = 0.5, so the longitude span doubles.
        assert!((bbox.max_lng - 12.0).abs() < 1e-9);
        assert!((bbox.min_lng - 8.0).abs() < 1e-9);
        assert!((bbox.max_lat - 61.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounding_box_corner_outside_radius() {
        // The box corner survives the pre-filter but is farther than the radius.
        let center = GeoPoint::new(10.0, 10.0).unwrap();
        let radius = 50.0;
        let bbox = BoundingBox::around(&center, radius);

        let corner_lat = bbox.max_lat - 1e-6;
        let corner_lng = bbox.max_lng - 1e-6;
        assert!(bbox.contains(corner_lat, corner_lng));
        assert!(distance_km(center.lat, center.lng, corner_lat, corner_lng) > radius);
    }

    #[test]
    fn test_validate_radius() {
        assert_eq!(validate_radius(10.0), Ok(10.0));
        assert_eq!(validate_radius(0.0), Err(GeoError::InvalidRadius(0.0)));
        assert_eq!(validate_radius(-5.0), Err(GeoError::InvalidRadius(-5.0)));
        assert!(validate_radius(f64::NAN).is_err());
    }
}
