//! Moderation of submitted content.
//!
//! Actions, resources and stories share the `pending → approved | rejected`
//! lifecycle. A decision updates the record and notifies its owner in one
//! transaction, so an owner never sees a notification for a change that
//! did not stick (or the reverse).

use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{ModerationStatus, Notification, TargetType};
use crate::notification;

/// What a moderation decision changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModerationOutcome {
    pub target_type: TargetType,
    pub target_id: i64,
    pub owner_id: i64,
    pub status: ModerationStatus,
    /// Notification sent to the owner, if the decision warranted one.
    pub notification: Option<Notification>,
}

/// Set the moderation status of a record and notify its owner.
///
/// Moving a record back to `pending` does not notify anyone.
pub async fn set_status(
    pool: &SqlitePool,
    target: TargetType,
    id: i64,
    status: ModerationStatus,
) -> Result<ModerationOutcome> {
    let mut tx = pool.begin().await?;

    let sql = format!(
        "UPDATE {} SET status = ? WHERE id = ? RETURNING user_id, title",
        target.table()
    );
    let row: Option<(i64, String)> = sqlx::query_as(&sql)
        .bind(status)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

    let Some((owner_id, title)) = row else {
        return Err(DatabaseError::not_found(target.entity(), id));
    };

    let notification = match status {
        ModerationStatus::Pending => None,
        ModerationStatus::Approved | ModerationStatus::Rejected => {
            let message = format!(
                "Your {} \"{}\" was {}.",
                target.entity().to_lowercase(),
                title,
                status
            );
            let link = format!("/{}/{}", target.table(), id);
            Some(notification::create_notification(&mut *tx, owner_id, &message, Some(&link)).await?)
        }
    };

    tx.commit().await?;

    tracing::info!(
        table = target.table(),
        id,
        owner_id,
        status = %status,
        "Moderation status changed"
    );

    Ok(ModerationOutcome {
        target_type: target,
        target_id: id,
        owner_id,
        status,
        notification,
    })
}

/// Whether the record exists and is approved.
pub async fn is_approved(pool: &SqlitePool, target: TargetType, id: i64) -> Result<bool> {
    let sql = format!(
        "SELECT 1 FROM {} WHERE id = ? AND status = 'approved'",
        target.table()
    );
    let found = sqlx::query_scalar::<_, i32>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(found.is_some())
}

/// Count records in each moderation state.
pub async fn count_by_status(
    pool: &SqlitePool,
    target: TargetType,
) -> Result<Vec<(ModerationStatus, i64)>> {
    let sql = format!(
        "SELECT status, COUNT(*) FROM {} GROUP BY status ORDER BY status",
        target.table()
    );
    let rows = sqlx::query_as::<_, (ModerationStatus, i64)>(&sql)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}
