//! Personal stories.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use database::validation::{self, MAX_BODY_LENGTH, MAX_SHORT_LENGTH, MAX_TITLE_LENGTH};
use database::{story, ModerationStatus};
use serde::Deserialize;
use serde_json::{json, Value};

use super::params::PageQuery;
use super::{created, ok, Success};
use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::identity::Identity;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StoryForm {
    pub title: String,
    pub body: String,
    pub country: Option<String>,
}

/// `POST /api/stories`
pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(form): ApiJson<StoryForm>,
) -> Result<(StatusCode, Json<Success<Value>>)> {
    let user = identity.require_user()?;

    let title = validation::required_text("title", &form.title, MAX_TITLE_LENGTH)?;
    let body = validation::required_text("body", &form.body, MAX_BODY_LENGTH)?;
    let country = validation::optional_text("country", form.country.as_deref(), MAX_SHORT_LENGTH)?;
    let country = (!country.is_empty()).then_some(country);

    let story = story::create_story(state.db.pool(), user.id, &title, &body, country.as_deref()).await?;

    Ok(created(json!({
        "message": "Story submitted for review",
        "story": story,
    })))
}

/// `GET /api/stories`
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> Result<Json<Success<Value>>> {
    let (limit, offset) = page.resolve(&state.limits)?;
    let stories = story::list_approved(state.db.pool(), limit, offset).await?;

    Ok(ok(json!({
        "count": stories.len(),
        "stories": stories,
    })))
}

/// `GET /api/stories/:id`
pub async fn show(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Success<Value>>> {
    let story = story::get_story(state.db.pool(), id).await?;

    if story.status != ModerationStatus::Approved && !identity.can_see_unpublished(story.user_id) {
        return Err(ApiError::NotFound(format!("Story not found: {id}")));
    }

    Ok(ok(json!({ "story": story })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::TestApp;

    #[tokio::test]
    async fn test_story_moderation_flow() {
        let app = TestApp::new().await;
        let author = app.user("author@example.org").await;
        let admin = app.admin().await;

        let (status, body) = app
            .post(
                "/api/stories",
                Some(author.id),
                json!({"title": "Crossing the line", "body": "We met at the border.", "country": " "}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["story"]["country"].is_null());
        let id = body["story"]["id"].as_i64().unwrap();

        let (status, _) = app
            .put(
                &format!("/api/admin/stories/{id}/status"),
                Some(author.id),
                json!({"status": "approved"}),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .put(
                &format!("/api/admin/stories/{id}/status"),
                Some(admin.id),
                json!({"status": "rejected"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app.get(&format!("/api/stories/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, shown) = app.get(&format!("/api/stories/{id}"), Some(author.id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(shown["story"]["status"], "rejected");

        let (_, listed) = app.get("/api/stories", None).await;
        assert_eq!(listed["count"], 0);
    }

    #[tokio::test]
    async fn test_story_requires_body() {
        let app = TestApp::new().await;
        let author = app.user("author@example.org").await;

        let (status, body) = app
            .post("/api/stories", Some(author.id), json!({"title": "Empty", "body": "  "}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "body is required");
    }
}
