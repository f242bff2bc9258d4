//! Reminders for upcoming actions.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use database::{moderation, reminder, validation, TargetType};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{created, ok, Success};
use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::identity::Identity;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReminderForm {
    pub action_id: i64,
    /// `YYYY-MM-DD HH:MM:SS`
    pub remind_at: String,
}

/// `POST /api/reminders`
pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(form): ApiJson<ReminderForm>,
) -> Result<(StatusCode, Json<Success<Value>>)> {
    let user = identity.require_user()?;
    let remind_at = validation::datetime("remind_at", &form.remind_at)?;

    if !moderation::is_approved(state.db.pool(), TargetType::Action, form.action_id).await? {
        return Err(ApiError::NotFound(format!("Action not found: {}", form.action_id)));
    }

    let reminder = reminder::create_reminder(state.db.pool(), user.id, form.action_id, &remind_at).await?;

    Ok(created(json!({ "reminder": reminder })))
}

/// `GET /api/reminders`
pub async fn list(State(state): State<AppState>, identity: Identity) -> Result<Json<Success<Value>>> {
    let user = identity.require_user()?;
    let reminders = reminder::list_for_user(state.db.pool(), user.id).await?;

    Ok(ok(json!({
        "count": reminders.len(),
        "reminders": reminders,
    })))
}

/// `DELETE /api/reminders/:id`
pub async fn remove(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Success<Value>>> {
    let user = identity.require_user()?;
    reminder::delete_reminder(state.db.pool(), user.id, id).await?;

    Ok(ok(json!({ "message": "Reminder deleted" })))
}
