//! Resource CRUD operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{NewResource, Resource};

/// Columns selected for [`Resource`] rows.
pub(crate) const RESOURCE_COLUMNS: &str = "id, user_id, title, description, category, url, \
     location, country, latitude, longitude, status, created_at";

/// Submit a new resource. It starts out `pending`.
pub async fn create_resource(pool: &SqlitePool, resource: &NewResource) -> Result<Resource> {
    let sql = format!(
        r#"
        INSERT INTO resources
            (user_id, title, description, category, url, location, country, latitude, longitude)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {RESOURCE_COLUMNS}
        "#
    );

    let created = sqlx::query_as::<_, Resource>(&sql)
        .bind(resource.user_id)
        .bind(&resource.title)
        .bind(&resource.description)
        .bind(&resource.category)
        .bind(&resource.url)
        .bind(&resource.location)
        .bind(&resource.country)
        .bind(resource.latitude)
        .bind(resource.longitude)
        .fetch_one(pool)
        .await?;

    tracing::info!(id = created.id, user_id = created.user_id, "Resource submitted");
    Ok(created)
}

/// Get a resource by ID regardless of status.
pub async fn get_resource(pool: &SqlitePool, id: i64) -> Result<Resource> {
    let sql = format!("SELECT {RESOURCE_COLUMNS} FROM resources WHERE id = ?");

    sqlx::query_as::<_, Resource>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Resource", id))
}

/// List approved resources, newest first.
pub async fn list_approved(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<Resource>> {
    let sql = format!(
        r#"
        SELECT {RESOURCE_COLUMNS}
        FROM resources
        WHERE status = 'approved'
        ORDER BY created_at DESC, id DESC
        LIMIT ? OFFSET ?
        "#
    );

    let resources = sqlx::query_as::<_, Resource>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(resources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{approve, seed_user};
    use crate::models::ModerationStatus;
    use crate::test_db;

    #[tokio::test]
    async fn test_resource_lifecycle() {
        let db = test_db().await;
        let user = seed_user(db.pool(), "owner@example.org").await;

        let resource = create_resource(
            db.pool(),
            &NewResource {
                user_id: user.id,
                title: "Mediation handbook".to_string(),
                url: Some("https://example.org/handbook".to_string()),
                country: "Colombia".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(resource.status, ModerationStatus::Pending);
        assert!(list_approved(db.pool(), 10, 0).await.unwrap().is_empty());

        approve(db.pool(), "resources", resource.id).await;

        let listed = list_approved(db.pool(), 10, 0).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].url.as_deref(), Some("https://example.org/handbook"));

        assert!(matches!(
            get_resource(db.pool(), resource.id + 1).await,
            Err(DatabaseError::NotFound { entity: "Resource", .. })
        ));
    }
}
