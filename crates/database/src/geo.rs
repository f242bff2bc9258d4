//! Nearby-location queries.
//!
//! The database narrows candidates with a bounding box on the indexed
//! `latitude`/`longitude` columns. The exact great-circle distance is then
//! computed for each candidate, rows beyond the radius are dropped, and the
//! rest are sorted nearest first and cut to the limit.

use geo_core::{BoundingBox, GeoPoint};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

use crate::action::ACTION_COLUMNS;
use crate::error::Result;
use crate::models::{Action, Located, Resource};
use crate::resource::RESOURCE_COLUMNS;

/// A record together with its distance from the search center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nearby<T> {
    #[serde(flatten)]
    pub record: T,
    pub distance_km: f64,
}

/// Approved actions within `radius_km` of `center`, nearest first.
pub async fn nearby_actions(
    pool: &SqlitePool,
    center: &GeoPoint,
    radius_km: f64,
    limit: usize,
) -> Result<Vec<Nearby<Action>>> {
    let candidates = bounding_box_candidates(pool, "actions", ACTION_COLUMNS, center, radius_km).await?;
    Ok(rank_by_distance(candidates, center, radius_km, limit))
}

/// Approved resources within `radius_km` of `center`, nearest first.
pub async fn nearby_resources(
    pool: &SqlitePool,
    center: &GeoPoint,
    radius_km: f64,
    limit: usize,
) -> Result<Vec<Nearby<Resource>>> {
    let candidates =
        bounding_box_candidates(pool, "resources", RESOURCE_COLUMNS, center, radius_km).await?;
    Ok(rank_by_distance(candidates, center, radius_km, limit))
}

async fn bounding_box_candidates<T>(
    pool: &SqlitePool,
    table: &str,
    columns: &str,
    center: &GeoPoint,
    radius_km: f64,
) -> Result<Vec<T>>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let bbox = BoundingBox::around(center, radius_km);

    let sql = format!(
        r#"
        SELECT {columns}
        FROM {table}
        WHERE status = 'approved'
          AND latitude IS NOT NULL
          AND longitude IS NOT NULL
          AND latitude BETWEEN ? AND ?
          AND longitude BETWEEN ? AND ?
        "#
    );

    let rows = sqlx::query_as::<_, T>(&sql)
        .bind(bbox.min_lat)
        .bind(bbox.max_lat)
        .bind(bbox.min_lng)
        .bind(bbox.max_lng)
        .fetch_all(pool)
        .await?;

    tracing::debug!(table, candidates = rows.len(), radius_km, "Bounding box pre-filter");
    Ok(rows)
}

/// Attach exact distances, drop rows outside the radius, sort ascending and
/// truncate. Rows without coordinates are dropped.
pub fn rank_by_distance<T: Located>(
    rows: Vec<T>,
    center: &GeoPoint,
    radius_km: f64,
    limit: usize,
) -> Vec<Nearby<T>> {
    let mut ranked: Vec<Nearby<T>> = rows
        .into_iter()
        .filter_map(|record| {
            let (lat, lng) = record.coordinates()?;
            let distance_km = geo_core::geo::distance_km(center.lat, center.lng, lat, lng);
            (distance_km <= radius_km).then_some(Nearby {
                record,
                distance_km,
            })
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(limit);
    ranked
}
