//! Location primitives for Connect for Peace.
//!
//! This crate has no I/O. It provides:
//!
//! - [`country`] - Canonical country names and spelling variants for matching
//!   the inconsistently stored `country` column
//! - [`geo`] - Coordinates, bounding boxes and great-circle distances used by
//!   the nearby-locations search
//!
//! # Example
//!
//! ```rust
//! use geo_core::{country, GeoPoint};
//!
//! assert_eq!(country::normalize("UK"), "United Kingdom");
//!
//! let paris = GeoPoint::new(48.8566, 2.3522).unwrap();
//! let london = GeoPoint::new(51.5074, -0.1278).unwrap();
//! assert!((paris.distance_km(&london) - 343.5).abs() < 1.0);
//! ```

pub mod country;
mod error;
pub mod geo;

pub use error::GeoError;
pub use geo::{BoundingBox, GeoPoint, EARTH_RADIUS_KM, KM_PER_DEGREE_LAT};
