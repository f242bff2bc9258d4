//! Query parameter parsing shared by list endpoints.
//!
//! Parameters arrive as raw strings so that a malformed number becomes a
//! 400 with a readable message rather than an extractor rejection.

use std::str::FromStr;

use serde::Deserialize;

use crate::config::Limits;
use crate::error::{ApiError, Result};

/// Parse an optional numeric parameter. Blank counts as absent.
pub fn number<T: FromStr>(field: &str, raw: Option<&str>) -> Result<Option<T>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|_| ApiError::Validation(format!("{field} must be a number"))),
    }
}

/// Trimmed text parameter, `None` when blank.
pub fn text(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

/// `limit` and `offset` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl PageQuery {
    /// Resolve to `(limit, offset)`. The limit defaults from `limits`, must
    /// be at least 1 and is capped at the maximum; the offset must not be
    /// negative.
    pub fn resolve(&self, limits: &Limits) -> Result<(i64, i64)> {
        let limit = resolve_limit(limits, self.limit.as_deref())?;

        let offset = number::<i64>("offset", self.offset.as_deref())?.unwrap_or(0);
        if offset < 0 {
            return Err(ApiError::Validation("offset must not be negative".to_string()));
        }

        Ok((limit, offset))
    }
}

/// Resolve a raw `limit` parameter against the configured defaults.
pub fn resolve_limit(limits: &Limits, raw: Option<&str>) -> Result<i64> {
    let limit = number::<i64>("limit", raw)?.unwrap_or(limits.default_limit);
    if limit < 1 {
        return Err(ApiError::Validation("limit must be at least 1".to_string()));
    }
    Ok(limit.min(limits.max_limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(limit: Option<&str>, offset: Option<&str>) -> PageQuery {
        PageQuery {
            limit: limit.map(String::from),
            offset: offset.map(String::from),
        }
    }

    #[test]
    fn test_defaults_and_cap() {
        let limits = Limits::default();
        assert_eq!(page(None, None).resolve(&limits).unwrap(), (20, 0));
        assert_eq!(page(Some("5"), Some("10")).resolve(&limits).unwrap(), (5, 10));
        assert_eq!(page(Some("5000"), None).resolve(&limits).unwrap(), (100, 0));
        assert_eq!(page(Some(" "), Some("")).resolve(&limits).unwrap(), (20, 0));
    }

    #[test]
    fn test_rejects_bad_values() {
        let limits = Limits::default();
        assert!(page(Some("0"), None).resolve(&limits).is_err());
        assert!(page(Some("ten"), None).resolve(&limits).is_err());
        assert!(page(None, Some("-1")).resolve(&limits).is_err());
    }

    #[test]
    fn test_number() {
        assert_eq!(number::<f64>("lat", Some(" 48.85 ")).unwrap(), Some(48.85));
        assert_eq!(number::<f64>("lat", None).unwrap(), None);
        let err = number::<f64>("lat", Some("north")).unwrap_err();
        assert_eq!(err.to_string(), "lat must be a number");
    }
}
