//! Text and country search over approved actions and resources.

use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::action::ACTION_COLUMNS;
use crate::error::Result;
use crate::models::{Action, Resource};
use crate::resource::RESOURCE_COLUMNS;

/// Search criteria. At least one of `text` or `countries` should be set;
/// an empty filter matches every approved row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    /// Substring matched against title, description, location and category.
    pub text: Option<String>,
    /// Spellings OR-matched against the `country` column.
    pub countries: Vec<String>,
}

/// One page of matches plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

/// Search approved actions, newest first.
pub async fn search_actions(
    pool: &SqlitePool,
    filter: &SearchFilter,
    limit: i64,
    offset: i64,
) -> Result<Page<Action>> {
    search_table(pool, "actions", ACTION_COLUMNS, filter, limit, offset).await
}

/// Search approved resources, newest first.
pub async fn search_resources(
    pool: &SqlitePool,
    filter: &SearchFilter,
    limit: i64,
    offset: i64,
) -> Result<Page<Resource>> {
    search_table(pool, "resources", RESOURCE_COLUMNS, filter, limit, offset).await
}

async fn search_table<T>(
    pool: &SqlitePool,
    table: &str,
    columns: &str,
    filter: &SearchFilter,
    limit: i64,
    offset: i64,
) -> Result<Page<T>>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut count_query: QueryBuilder<'_, Sqlite> =
        QueryBuilder::new(format!("SELECT COUNT(*) FROM {table}"));
    push_filter(&mut count_query, filter);
    let total = count_query.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut page_query: QueryBuilder<'_, Sqlite> =
        QueryBuilder::new(format!("SELECT {columns} FROM {table}"));
    push_filter(&mut page_query, filter);
    page_query.push(" ORDER BY created_at DESC, id DESC LIMIT ");
    page_query.push_bind(limit);
    page_query.push(" OFFSET ");
    page_query.push_bind(offset);
    let items = page_query.build_query_as::<T>().fetch_all(pool).await?;

    Ok(Page { items, total })
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &SearchFilter) {
    qb.push(" WHERE status = 'approved'");

    if let Some(text) = filter.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = format!("%{}%", text);
        qb.push(" AND (title LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR description LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR location LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR category LIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    if !filter.countries.is_empty() {
        qb.push(" AND country COLLATE NOCASE IN (");
        let mut separated = qb.separated(", ");
        for country in &filter.countries {
            separated.push_bind(country.clone());
        }
        separated.push_unseparated(")");
    }
}
