//! Admin moderation and statistics.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use database::moderation::{self, ModerationOutcome};
use database::{report, user, ModerationStatus, TargetType};
use serde::{Deserialize, Serialize};

use super::{ok, Success};
use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::identity::Identity;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// `PUT /api/admin/actions/:id/status`
pub async fn set_action_status(
    state: State<AppState>,
    identity: Identity,
    path: ApiPath<i64>,
    form: ApiJson<StatusForm>,
) -> Result<Json<Success<ModerationOutcome>>> {
    set_status(TargetType::Action, state, identity, path, form).await
}

/// `PUT /api/admin/resources/:id/status`
pub async fn set_resource_status(
    state: State<AppState>,
    identity: Identity,
    path: ApiPath<i64>,
    form: ApiJson<StatusForm>,
) -> Result<Json<Success<ModerationOutcome>>> {
    set_status(TargetType::Resource, state, identity, path, form).await
}

/// `PUT /api/admin/stories/:id/status`
pub async fn set_story_status(
    state: State<AppState>,
    identity: Identity,
    path: ApiPath<i64>,
    form: ApiJson<StatusForm>,
) -> Result<Json<Success<ModerationOutcome>>> {
    set_status(TargetType::Story, state, identity, path, form).await
}

async fn set_status(
    target: TargetType,
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(id): ApiPath<i64>,
    ApiJson(form): ApiJson<StatusForm>,
) -> Result<Json<Success<ModerationOutcome>>> {
    let admin = identity.require_admin()?;
    let status = form
        .status
        .parse::<ModerationStatus>()
        .map_err(ApiError::Validation)?;

    let outcome = moderation::set_status(state.db.pool(), target, id, status).await?;
    tracing::info!(admin_id = admin.id, table = target.table(), id, status = %status, "Moderated");

    Ok(ok(outcome))
}

#[derive(Debug, Serialize)]
pub struct Stats {
    pub users: i64,
    pub actions: BTreeMap<&'static str, i64>,
    pub resources: BTreeMap<&'static str, i64>,
    pub stories: BTreeMap<&'static str, i64>,
    pub open_reports: i64,
}

async fn status_counts(state: &AppState, target: TargetType) -> Result<BTreeMap<&'static str, i64>> {
    let mut counts: BTreeMap<&'static str, i64> = [
        ModerationStatus::Pending,
        ModerationStatus::Approved,
        ModerationStatus::Rejected,
    ]
    .into_iter()
    .map(|s| (s.as_str(), 0))
    .collect();

    for (status, count) in moderation::count_by_status(state.db.pool(), target).await? {
        counts.insert(status.as_str(), count);
    }
    Ok(counts)
}

/// `GET /api/admin/stats`
pub async fn stats(State(state): State<AppState>, identity: Identity) -> Result<Json<Success<Stats>>> {
    identity.require_admin()?;

    Ok(ok(Stats {
        users: user::count_users(state.db.pool()).await?,
        actions: status_counts(&state, TargetType::Action).await?,
        resources: status_counts(&state, TargetType::Resource).await?,
        stories: status_counts(&state, TargetType::Story).await?,
        open_reports: report::count_open(state.db.pool()).await?,
    }))
}
