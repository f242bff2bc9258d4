//! The caller's notifications.

use axum::extract::State;
use axum::Json;
use database::notification;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ok, Success};
use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, ApiQuery};
use crate::identity::Identity;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    pub unread_only: Option<String>,
}

impl NotificationQuery {
    fn unread_only(&self) -> bool {
        matches!(
            self.unread_only.as_deref().map(str::trim),
            Some("1" | "true" | "yes")
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct IdList {
    pub ids: Vec<i64>,
}

impl IdList {
    fn non_empty(&self) -> Result<&[i64]> {
        if self.ids.is_empty() {
            return Err(ApiError::Validation("ids must not be empty".to_string()));
        }
        Ok(&self.ids)
    }
}

/// `GET /api/notifications?unread_only=`
pub async fn list(
    State(state): State<AppState>,
    identity: Identity,
    ApiQuery(query): ApiQuery<NotificationQuery>,
) -> Result<Json<Success<Value>>> {
    let user = identity.require_user()?;

    let notifications =
        notification::list_for_user(state.db.pool(), user.id, query.unread_only()).await?;
    let unread = notification::count_unread(state.db.pool(), user.id).await?;

    Ok(ok(json!({
        "count": notifications.len(),
        "unread": unread,
        "notifications": notifications,
    })))
}

/// `POST /api/notifications/read`
pub async fn mark_read(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(body): ApiJson<IdList>,
) -> Result<Json<Success<Value>>> {
    let user = identity.require_user()?;

    let updated = notification::mark_read(state.db.pool(), user.id, body.non_empty()?).await?;

    Ok(ok(json!({ "updated": updated })))
}

/// `POST /api/notifications/delete`
///
/// Deletes every listed notification or none of them.
pub async fn delete_many(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(body): ApiJson<IdList>,
) -> Result<Json<Success<Value>>> {
    let user = identity.require_user()?;

    let deleted = notification::delete_many(state.db.pool(), user.id, body.non_empty()?).await?;

    Ok(ok(json!({ "deleted": deleted })))
}
