//! Comments on actions, resources and stories.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use database::validation::{self, MAX_BODY_LENGTH};
use database::{comment, moderation, TargetType};
use serde::Deserialize;
use serde_json::{json, Value};

use super::params;
use super::{created, ok, Success};
use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::identity::Identity;
use crate::state::AppState;

pub(crate) fn parse_target(raw: &str) -> Result<TargetType> {
    raw.parse::<TargetType>().map_err(ApiError::Validation)
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub target_type: String,
    pub target_id: i64,
    pub body: String,
}

/// `POST /api/comments`
pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(form): ApiJson<CommentForm>,
) -> Result<(StatusCode, Json<Success<Value>>)> {
    let user = identity.require_user()?;
    let target = parse_target(&form.target_type)?;
    let body = validation::required_text("body", &form.body, MAX_BODY_LENGTH)?;

    if !moderation::is_approved(state.db.pool(), target, form.target_id).await? {
        return Err(ApiError::NotFound(format!(
            "{} not found: {}",
            target.entity(),
            form.target_id
        )));
    }

    let comment = comment::create_comment(state.db.pool(), user.id, target, form.target_id, &body).await?;

    Ok(created(json!({ "comment": comment })))
}

#[derive(Debug, Deserialize)]
pub struct CommentQuery {
    pub target_type: Option<String>,
    pub target_id: Option<String>,
}

/// `GET /api/comments?target_type=&target_id=`
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CommentQuery>,
) -> Result<Json<Success<Value>>> {
    let (Some(raw_target), Some(target_id)) = (
        params::text(query.target_type.as_deref()),
        params::number::<i64>("target_id", query.target_id.as_deref())?,
    ) else {
        return Err(ApiError::Validation(
            "target_type and target_id are required".to_string(),
        ));
    };
    let target = parse_target(raw_target)?;

    let comments = comment::list_for_target(state.db.pool(), target, target_id).await?;

    Ok(ok(json!({
        "count": comments.len(),
        "comments": comments,
    })))
}

/// `DELETE /api/comments/:id`
pub async fn remove(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Success<Value>>> {
    let comment = comment::get_comment(state.db.pool(), id).await?;
    identity.require_owner_or_admin(comment.user_id)?;

    comment::delete_comment(state.db.pool(), id).await?;

    Ok(ok(json!({ "message": "Comment deleted" })))
}
