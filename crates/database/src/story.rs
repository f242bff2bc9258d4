//! Story CRUD operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Story;

/// Submit a new story. It starts out `pending`.
pub async fn create_story(
    pool: &SqlitePool,
    user_id: i64,
    title: &str,
    body: &str,
    country: Option<&str>,
) -> Result<Story> {
    let story = sqlx::query_as::<_, Story>(
        r#"
        INSERT INTO stories (user_id, title, body, country)
        VALUES (?, ?, ?, ?)
        RETURNING id, user_id, title, body, country, status, created_at
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(body)
    .bind(country)
    .fetch_one(pool)
    .await?;

    Ok(story)
}

/// Get a story by ID regardless of status.
pub async fn get_story(pool: &SqlitePool, id: i64) -> Result<Story> {
    sqlx::query_as::<_, Story>(
        r#"
        SELECT id, user_id, title, body, country, status, created_at
        FROM stories
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("Story", id))
}

/// List approved stories, newest first.
pub async fn list_approved(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<Story>> {
    let stories = sqlx::query_as::<_, Story>(
        r#"
        SELECT id, user_id, title, body, country, status, created_at
        FROM stories
        WHERE status = 'approved'
        ORDER BY created_at DESC, id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(stories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{approve, seed_user};
    use crate::test_db;

    #[tokio::test]
    async fn test_story_listing() {
        let db = test_db().await;
        let user = seed_user(db.pool(), "writer@example.org").await;

        let story = create_story(db.pool(), user.id, "Rebuilding", "We met weekly.", None)
            .await
            .unwrap();
        assert!(story.country.is_none());
        assert!(list_approved(db.pool(), 10, 0).await.unwrap().is_empty());

        approve(db.pool(), "stories", story.id).await;
        let listed = list_approved(db.pool(), 10, 0).await.unwrap();
        assert_eq!(listed[0].title, "Rebuilding");

        assert_eq!(get_story(db.pool(), story.id).await.unwrap().body, "We met weekly.");
    }
}
