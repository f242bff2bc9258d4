//! Comment CRUD operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Comment, TargetType};

/// Add a comment to a record. The caller checks the target is visible.
pub async fn create_comment(
    pool: &SqlitePool,
    user_id: i64,
    target: TargetType,
    target_id: i64,
    body: &str,
) -> Result<Comment> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (user_id, target_type, target_id, body)
        VALUES (?, ?, ?, ?)
        RETURNING id, user_id, target_type, target_id, body, created_at
        "#,
    )
    .bind(user_id)
    .bind(target)
    .bind(target_id)
    .bind(body)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Get a comment by ID.
pub async fn get_comment(pool: &SqlitePool, id: i64) -> Result<Comment> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, user_id, target_type, target_id, body, created_at
        FROM comments
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("Comment", id))
}

/// List comments on a record, oldest first.
pub async fn list_for_target(
    pool: &SqlitePool,
    target: TargetType,
    target_id: i64,
) -> Result<Vec<Comment>> {
    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, user_id, target_type, target_id, body, created_at
        FROM comments
        WHERE target_type = ? AND target_id = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(target)
    .bind(target_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

/// Delete a comment by ID.
pub async fn delete_comment(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM comments
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Comment", id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::seed_user;
    use crate::test_db;

    #[tokio::test]
    async fn test_comment_thread() {
        let db = test_db().await;
        let user = seed_user(db.pool(), "c@example.org").await;

        let first = create_comment(db.pool(), user.id, TargetType::Action, 1, "Count me in")
            .await
            .unwrap();
        create_comment(db.pool(), user.id, TargetType::Action, 1, "Bringing water")
            .await
            .unwrap();
        create_comment(db.pool(), user.id, TargetType::Story, 1, "Thank you")
            .await
            .unwrap();

        let thread = list_for_target(db.pool(), TargetType::Action, 1).await.unwrap();
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].body, "Count me in");
        assert_eq!(thread[0].target_type, TargetType::Action);

        delete_comment(db.pool(), first.id).await.unwrap();
        assert!(matches!(
            get_comment(db.pool(), first.id).await,
            Err(DatabaseError::NotFound { .. })
        ));
        assert!(delete_comment(db.pool(), first.id).await.is_err());
    }
}
