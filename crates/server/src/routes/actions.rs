//! Action submission and listing.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use database::validation::{self, MAX_BODY_LENGTH, MAX_SHORT_LENGTH, MAX_TITLE_LENGTH};
use database::{action, ModerationStatus, NewAction};
use serde::Deserialize;
use serde_json::{json, Value};

use super::params::PageQuery;
use super::{created, ok, Success};
use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::identity::Identity;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ActionForm {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub start_date: Option<String>,
}

impl ActionForm {
    fn validate(self, user_id: i64) -> std::result::Result<NewAction, validation::ValidationError> {
        let point = validation::coordinates(self.latitude, self.longitude)?;
        let start_date = match self.start_date.as_deref().map(str::trim) {
            Some(date) if !date.is_empty() => Some(validation::datetime("start_date", date)?),
            _ => None,
        };

        Ok(NewAction {
            user_id,
            title: validation::required_text("title", &self.title, MAX_TITLE_LENGTH)?,
            description: validation::optional_text(
                "description",
                self.description.as_deref(),
                MAX_BODY_LENGTH,
            )?,
            category: validation::optional_text("category", self.category.as_deref(), MAX_SHORT_LENGTH)?,
            location: validation::optional_text("location", self.location.as_deref(), MAX_SHORT_LENGTH)?,
            country: validation::optional_text("country", self.country.as_deref(), MAX_SHORT_LENGTH)?,
            latitude: point.map(|p| p.lat),
            longitude: point.map(|p| p.lng),
            start_date,
        })
    }
}

/// `POST /api/actions`
pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(form): ApiJson<ActionForm>,
) -> Result<(StatusCode, Json<Success<Value>>)> {
    let user = identity.require_user()?;
    let new_action = form.validate(user.id)?;

    let action = action::create_action(state.db.pool(), &new_action).await?;

    Ok(created(json!({
        "message": "Action submitted for review",
        "action": action,
    })))
}

/// `GET /api/actions`
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> Result<Json<Success<Value>>> {
    let (limit, offset) = page.resolve(&state.limits)?;
    let actions = action::list_approved(state.db.pool(), limit, offset).await?;

    Ok(ok(json!({
        "count": actions.len(),
        "actions": actions,
    })))
}

/// `GET /api/actions/:id`
///
/// Unapproved actions are visible only to their owner and admins; everyone
/// else gets a 404 as if the action did not exist.
pub async fn show(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Success<Value>>> {
    let action = action::get_action(state.db.pool(), id).await?;

    if action.status != ModerationStatus::Approved && !identity.can_see_unpublished(action.user_id) {
        return Err(ApiError::NotFound(format!("Action not found: {id}")));
    }

    Ok(ok(json!({ "action": action })))
}
