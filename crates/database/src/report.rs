//! Abuse report operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Report, ReportStatus, TargetType};

const REPORT_COLUMNS: &str =
    "id, reporter_id, target_type, target_id, reason, status, created_at, resolved_at";

/// File a report. It starts out `open`.
pub async fn create_report(
    pool: &SqlitePool,
    reporter_id: i64,
    target: TargetType,
    target_id: i64,
    reason: &str,
) -> Result<Report> {
    let sql = format!(
        r#"
        INSERT INTO reports (reporter_id, target_type, target_id, reason)
        VALUES (?, ?, ?, ?)
        RETURNING {REPORT_COLUMNS}
        "#
    );

    let report = sqlx::query_as::<_, Report>(&sql)
        .bind(reporter_id)
        .bind(target)
        .bind(target_id)
        .bind(reason)
        .fetch_one(pool)
        .await?;

    tracing::info!(id = report.id, target_id, "Report filed");
    Ok(report)
}

/// List reports, newest first, optionally filtered by status.
pub async fn list_reports(pool: &SqlitePool, status: Option<ReportStatus>) -> Result<Vec<Report>> {
    let sql = format!(
        r#"
        SELECT {REPORT_COLUMNS}
        FROM reports
        WHERE ? IS NULL OR status = ?
        ORDER BY created_at DESC, id DESC
        "#
    );

    let reports = sqlx::query_as::<_, Report>(&sql)
        .bind(status)
        .bind(status)
        .fetch_all(pool)
        .await?;

    Ok(reports)
}

/// Set a report's status. Closing a report stamps `resolved_at`;
/// reopening clears it.
pub async fn set_status(pool: &SqlitePool, id: i64, status: ReportStatus) -> Result<Report> {
    let sql = format!(
        r#"
        UPDATE reports
        SET status = ?,
            resolved_at = CASE WHEN ? = 'open' THEN NULL ELSE datetime('now') END
        WHERE id = ?
        RETURNING {REPORT_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Report>(&sql)
        .bind(status)
        .bind(status)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Report", id))
}

/// Count reports that still need review.
pub async fn count_open(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM reports WHERE status = 'open'
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
