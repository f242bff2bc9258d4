//! Error types for coordinate handling.

use thiserror::Error;

/// Errors raised when building geographic values from user input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Latitude outside [-90, 90] or not a finite number.
    #[error("latitude must be between -90 and 90, got {0}")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] or not a finite number.
    #[error("longitude must be between -180 and 180, got {0}")]
    InvalidLongitude(f64),

    /// Radius that is not a positive finite number of kilometers.
    #[error("radius must be a positive number of kilometers, got {0}")]
    InvalidRadius(f64),
}
