//! Reminder CRUD operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Reminder;

/// Create a reminder for an action. One reminder per user and action.
pub async fn create_reminder(
    pool: &SqlitePool,
    user_id: i64,
    action_id: i64,
    remind_at: &str,
) -> Result<Reminder> {
    sqlx::query_as::<_, Reminder>(
        r#"
        INSERT INTO reminders (user_id, action_id, remind_at)
        VALUES (?, ?, ?)
        RETURNING id, user_id, action_id, remind_at, created_at
        "#,
    )
    .bind(user_id)
    .bind(action_id)
    .bind(remind_at)
    .fetch_one(pool)
    .await
    .map_err(|e| DatabaseError::unique_or_sqlx(e, "Reminder", format!("{}/{}", user_id, action_id)))
}

/// List a user's reminders, soonest first.
pub async fn list_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Reminder>> {
    let reminders = sqlx::query_as::<_, Reminder>(
        r#"
        SELECT id, user_id, action_id, remind_at, created_at
        FROM reminders
        WHERE user_id = ?
        ORDER BY remind_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(reminders)
}

/// Delete one of a user's reminders.
pub async fn delete_reminder(pool: &SqlitePool, user_id: i64, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM reminders
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Reminder", id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action;
    use crate::fixtures::{new_action, seed_user};
    use crate::test_db;

    #[tokio::test]
    async fn test_reminders() {
        let db = test_db().await;
        let user = seed_user(db.pool(), "r@example.org").await;
        let other = seed_user(db.pool(), "o@example.org").await;
        let a = action::create_action(db.pool(), &new_action(user.id, "A", "Chile"))
            .await
            .unwrap();
        let b = action::create_action(db.pool(), &new_action(user.id, "B", "Chile"))
            .await
            .unwrap();

        create_reminder(db.pool(), user.id, a.id, "2026-06-02 10:00:00")
            .await
            .unwrap();
        let early = create_reminder(db.pool(), user.id, b.id, "2026-06-01 10:00:00")
            .await
            .unwrap();

        let duplicate = create_reminder(db.pool(), user.id, a.id, "2026-07-01 10:00:00").await;
        assert!(matches!(duplicate, Err(DatabaseError::AlreadyExists { .. })));

        let listed = list_for_user(db.pool(), user.id).await.unwrap();
        assert_eq!(listed[0].id, early.id);
        assert_eq!(listed.len(), 2);

        assert!(delete_reminder(db.pool(), other.id, early.id).await.is_err());
        delete_reminder(db.pool(), user.id, early.id).await.unwrap();
        assert_eq!(list_for_user(db.pool(), user.id).await.unwrap().len(), 1);
    }
}
