//! Notification CRUD operations.

use std::collections::BTreeSet;

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::Notification;

/// Create a notification for a user.
///
/// Accepts any executor so it can run inside a caller's transaction.
pub async fn create_notification<'e, E>(
    executor: E,
    user_id: i64,
    message: &str,
    link: Option<&str>,
) -> Result<Notification>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let notification = sqlx::query_as::<_, Notification>(
        r#"
        INSERT INTO notifications (user_id, message, link)
        VALUES (?, ?, ?)
        RETURNING id, user_id, message, link, is_read, created_at
        "#,
    )
    .bind(user_id)
    .bind(message)
    .bind(link)
    .fetch_one(executor)
    .await?;

    Ok(notification)
}

/// List a user's notifications, newest first.
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
    unread_only: bool,
) -> Result<Vec<Notification>> {
    let notifications = sqlx::query_as::<_, Notification>(
        r#"
        SELECT id, user_id, message, link, is_read, created_at
        FROM notifications
        WHERE user_id = ? AND (? = 0 OR is_read = 0)
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .bind(unread_only)
    .fetch_all(pool)
    .await?;

    Ok(notifications)
}

/// Count a user's unread notifications.
pub async fn count_unread(pool: &SqlitePool, user_id: i64) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM notifications
        WHERE user_id = ? AND is_read = 0
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Mark the given notifications read. Ids that are not the user's are ignored.
///
/// Returns the number of rows updated.
pub async fn mark_read(pool: &SqlitePool, user_id: i64, ids: &[i64]) -> Result<u64> {
    if ids.is_empty() {
        return Ok(0);
    }

    let mut qb: QueryBuilder<'_, Sqlite> =
        QueryBuilder::new("UPDATE notifications SET is_read = 1 WHERE user_id = ");
    qb.push_bind(user_id);
    qb.push(" AND id IN (");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let result = qb.build().execute(pool).await?;
    Ok(result.rows_affected())
}

/// Delete several of a user's notifications, all or nothing.
///
/// Duplicate ids are collapsed. If any id does not exist or belongs to
/// another user, nothing is deleted and `NotFound` names the first such id.
pub async fn delete_many(pool: &SqlitePool, user_id: i64, ids: &[i64]) -> Result<u64> {
    let ids: BTreeSet<i64> = ids.iter().copied().collect();
    let mut tx = pool.begin().await?;

    for id in &ids {
        let result = sqlx::query(
            r#"
            DELETE FROM notifications
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            tracing::warn!(user_id, id, "Notification delete rolled back");
            return Err(DatabaseError::not_found("Notification", id));
        }
    }

    tx.commit().await?;
    Ok(ids.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::seed_user;
    use crate::test_db;

    #[tokio::test]
    async fn test_list_and_mark_read() {
        let db = test_db().await;
        let user = seed_user(db.pool(), "reader@example.org").await;
        let other = seed_user(db.pool(), "other@example.org").await;

        let first = create_notification(db.pool(), user.id, "first", None).await.unwrap();
        let second = create_notification(db.pool(), user.id, "second", Some("/actions/1"))
            .await
            .unwrap();
        let foreign = create_notification(db.pool(), other.id, "theirs", None).await.unwrap();

        let all = list_for_user(db.pool(), user.id, false).await.unwrap();
        assert_eq!(all.iter().map(|n| n.id).collect::<Vec<_>>(), vec![second.id, first.id]);
        assert_eq!(count_unread(db.pool(), user.id).await.unwrap(), 2);

        let updated = mark_read(db.pool(), user.id, &[first.id, foreign.id]).await.unwrap();
        assert_eq!(updated, 1);

        let unread = list_for_user(db.pool(), user.id, true).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].id, second.id);
        assert_eq!(count_unread(db.pool(), other.id).await.unwrap(), 1);

        assert_eq!(mark_read(db.pool(), user.id, &[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_many_is_all_or_nothing() {
        let db = test_db().await;
        let user = seed_user(db.pool(), "reader@example.org").await;
        let other = seed_user(db.pool(), "other@example.org").await;

        let a = create_notification(db.pool(), user.id, "a", None).await.unwrap();
        let b = create_notification(db.pool(), user.id, "b", None).await.unwrap();
        let foreign = create_notification(db.pool(), other.id, "c", None).await.unwrap();

        let result = delete_many(db.pool(), user.id, &[a.id, foreign.id, b.id]).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
        assert_eq!(list_for_user(db.pool(), user.id, false).await.unwrap().len(), 2);
        assert_eq!(list_for_user(db.pool(), other.id, false).await.unwrap().len(), 1);

        let deleted = delete_many(db.pool(), user.id, &[a.id, b.id, a.id]).await.unwrap();
        assert_eq!(deleted, 2);
        assert!(list_for_user(db.pool(), user.id, false).await.unwrap().is_empty());
    }
}
