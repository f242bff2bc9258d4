//! Input validation for submitted records.

use std::fmt;

use chrono::NaiveDateTime;
use geo_core::{GeoError, GeoPoint};

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty value where one is required.
    Empty(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Value present but malformed.
    Invalid { field: String, reason: String },
    /// Number outside its allowed range.
    OutOfRange { field: String, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} is required", field),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Invalid { field, reason } => write!(f, "Invalid {}: {}", field, reason),
            ValidationError::OutOfRange { field, reason } => {
                write!(f, "{} out of range: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<GeoError> for ValidationError {
    fn from(err: GeoError) -> Self {
        let field = match err {
            GeoError::InvalidLatitude(_) => "latitude",
            GeoError::InvalidLongitude(_) => "longitude",
            GeoError::InvalidRadius(_) => "radius",
        };
        ValidationError::OutOfRange {
            field: field.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Maximum length for titles.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for descriptions, story bodies and report reasons.
pub const MAX_BODY_LENGTH: usize = 5000;

/// Maximum length for short text fields (category, location, country, name).
pub const MAX_SHORT_LENGTH: usize = 120;

/// Maximum allowed length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum allowed length for URLs.
pub const MAX_URL_LENGTH: usize = 2048;

/// Accepted timestamp format for dates supplied by clients.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Trim a required text field and enforce its maximum length.
pub fn required_text(field: &str, value: &str, max: usize) -> Result<String, ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }

    check_length(field, value, max)?;
    Ok(value.to_string())
}

/// Trim an optional text field; empty becomes `""`.
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<String, ValidationError> {
    let value = value.map(str::trim).unwrap_or_default();
    check_length(field, value, max)?;
    Ok(value.to_string())
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
            actual,
        });
    }
    Ok(())
}

/// Validate a latitude/longitude pair supplied together or not at all.
pub fn coordinates(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Option<GeoPoint>, ValidationError> {
    match (latitude, longitude) {
        (Some(lat), Some(lng)) => Ok(Some(GeoPoint::new(lat, lng)?)),
        (None, None) => Ok(None),
        _ => Err(ValidationError::Invalid {
            field: "coordinates".to_string(),
            reason: "latitude and longitude must be provided together".to_string(),
        }),
    }
}

/// Validate a `YYYY-MM-DD HH:MM:SS` timestamp, returning it trimmed.
pub fn datetime(field: &str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }

    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map_err(|_| ValidationError::Invalid {
        field: field.to_string(),
        reason: "expected format YYYY-MM-DD HH:MM:SS".to_string(),
    })?;

    Ok(value.to_string())
}

/// Validate an email address (basic local@domain.tld check).
pub fn email(value: &str) -> Result<String, ValidationError> {
    let email = value.trim();

    if email.is_empty() {
        return Err(ValidationError::Empty("email".to_string()));
    }

    check_length("email", email, MAX_EMAIL_LENGTH)?;

    let invalid = |reason: &str| ValidationError::Invalid {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    let (local, domain) = match email.split_once('@') {
        Some((local, domain)) if !domain.contains('@') => (local, domain),
        _ => return Err(invalid("must contain exactly one @ symbol")),
    };

    if local.is_empty() {
        return Err(invalid("missing local part (before @)"));
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("domain must look like example.org"));
    }

    if domain.contains("..") {
        return Err(invalid("domain cannot contain consecutive dots"));
    }

    Ok(email.to_string())
}

/// Validate an optional http(s) URL.
pub fn optional_url(value: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(url) = value.map(str::trim).filter(|u| !u.is_empty()) else {
        return Ok(None);
    };

    check_length("url", url, MAX_URL_LENGTH)?;

    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ValidationError::Invalid {
            field: "url".to_string(),
            reason: "must start with http:// or https://".to_string(),
        });
    }

    Ok(Some(url.to_string()))
}
