//! Resource submission and listing.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use database::validation::{self, MAX_BODY_LENGTH, MAX_SHORT_LENGTH, MAX_TITLE_LENGTH};
use database::{resource, ModerationStatus, NewResource};
use serde::Deserialize;
use serde_json::{json, Value};

use super::params::PageQuery;
use super::{created, ok, Success};
use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::identity::Identity;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResourceForm {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub url: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ResourceForm {
    fn validate(self, user_id: i64) -> std::result::Result<NewResource, validation::ValidationError> {
        let point = validation::coordinates(self.latitude, self.longitude)?;

        Ok(NewResource {
            user_id,
            title: validation::required_text("title", &self.title, MAX_TITLE_LENGTH)?,
            description: validation::optional_text(
                "description",
                self.description.as_deref(),
                MAX_BODY_LENGTH,
            )?,
            category: validation::optional_text("category", self.category.as_deref(), MAX_SHORT_LENGTH)?,
            url: validation::optional_url(self.url.as_deref())?,
            location: validation::optional_text("location", self.location.as_deref(), MAX_SHORT_LENGTH)?,
            country: validation::optional_text("country", self.country.as_deref(), MAX_SHORT_LENGTH)?,
            latitude: point.map(|p| p.lat),
            longitude: point.map(|p| p.lng),
        })
    }
}

/// `POST /api/resources`
pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(form): ApiJson<ResourceForm>,
) -> Result<(StatusCode, Json<Success<Value>>)> {
    let user = identity.require_user()?;
    let new_resource = form.validate(user.id)?;

    let resource = resource::create_resource(state.db.pool(), &new_resource).await?;

    Ok(created(json!({
        "message": "Resource submitted for review",
        "resource": resource,
    })))
}

/// `GET /api/resources`
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> Result<Json<Success<Value>>> {
    let (limit, offset) = page.resolve(&state.limits)?;
    let resources = resource::list_approved(state.db.pool(), limit, offset).await?;

    Ok(ok(json!({
        "count": resources.len(),
        "resources": resources,
    })))
}

/// `GET /api/resources/:id`
pub async fn show(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Success<Value>>> {
    let resource = resource::get_resource(state.db.pool(), id).await?;

    if resource.status != ModerationStatus::Approved && !identity.can_see_unpublished(resource.user_id) {
        return Err(ApiError::NotFound(format!("Resource not found: {id}")));
    }

    Ok(ok(json!({ "resource": resource })))
}
