//! Action (event) CRUD operations.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::{Action, NewAction};

/// Columns selected for [`Action`] rows.
pub(crate) const ACTION_COLUMNS: &str = "id, user_id, title, description, category, location, \
     country, latitude, longitude, start_date, status, created_at";

/// Submit a new action. It starts out `pending`.
pub async fn create_action(pool: &SqlitePool, action: &NewAction) -> Result<Action> {
    let sql = format!(
        r#"
        INSERT INTO actions
            (user_id, title, description, category, location, country, latitude, longitude, start_date)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {ACTION_COLUMNS}
        "#
    );

    let created = sqlx::query_as::<_, Action>(&sql)
        .bind(action.user_id)
        .bind(&action.title)
        .bind(&action.description)
        .bind(&action.category)
        .bind(&action.location)
        .bind(&action.country)
        .bind(action.latitude)
        .bind(action.longitude)
        .bind(&action.start_date)
        .fetch_one(pool)
        .await?;

    tracing::info!(id = created.id, user_id = created.user_id, "Action submitted");
    Ok(created)
}

/// Get an action by ID regardless of status.
pub async fn get_action(pool: &SqlitePool, id: i64) -> Result<Action> {
    let sql = format!("SELECT {ACTION_COLUMNS} FROM actions WHERE id = ?");

    sqlx::query_as::<_, Action>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Action", id))
}

/// List approved actions, newest first.
pub async fn list_approved(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<Action>> {
    let sql = format!(
        r#"
        SELECT {ACTION_COLUMNS}
        FROM actions
        WHERE status = 'approved'
        ORDER BY created_at DESC, id DESC
        LIMIT ? OFFSET ?
        "#
    );

    let actions = sqlx::query_as::<_, Action>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(actions)
}

/// List every action a user submitted, newest first.
pub async fn list_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Action>> {
    let sql = format!(
        r#"
        SELECT {ACTION_COLUMNS}
        FROM actions
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        "#
    );

    let actions = sqlx::query_as::<_, Action>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(actions)
}

/// Approved actions whose stored `country` equals any of the given spellings.
///
/// The spellings normally come from `geo_core::country::variants`. An empty
/// list matches nothing.
pub async fn list_by_country(pool: &SqlitePool, spellings: &[String]) -> Result<Vec<Action>> {
    if spellings.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(format!(
        "SELECT {ACTION_COLUMNS} FROM actions WHERE status = 'approved' AND country COLLATE NOCASE IN ("
    ));
    let mut separated = qb.separated(", ");
    for spelling in spellings {
        separated.push_bind(spelling.clone());
    }
    separated.push_unseparated(") ORDER BY created_at DESC, id DESC");

    let actions = qb.build_query_as::<Action>().fetch_all(pool).await?;
    Ok(actions)
}
