//! User registration and the current user.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use database::validation::{self, MAX_SHORT_LENGTH};
use database::{user, Role};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{created, ok, Success};
use crate::error::Result;
use crate::extract::ApiJson;
use crate::identity::Identity;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
}

/// `POST /api/users`
pub async fn register(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<RegisterForm>,
) -> Result<(StatusCode, Json<Success<Value>>)> {
    let name = validation::required_text("name", &form.name, MAX_SHORT_LENGTH)?;
    let email = validation::email(&form.email)?;

    let user = user::create_user(state.db.pool(), &name, &email, Role::User).await?;

    Ok(created(json!({ "user": user })))
}

/// `GET /api/me`
pub async fn me(identity: Identity) -> Result<Json<Success<Value>>> {
    let user = identity.require_user()?;
    Ok(ok(json!({ "user": user })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::TestApp;

    #[tokio::test]
    async fn test_register_and_me() {
        let app = TestApp::new().await;

        let (status, body) = app
            .post(
                "/api/users",
                None,
                json!({"name": "Amina", "email": "amina@example.org"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["role"], "user");
        let id = body["user"]["id"].as_i64().unwrap();

        let (status, body) = app.get("/api/me", Some(id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["email"], "amina@example.org");

        let (status, _) = app.get("/api/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let app = TestApp::new().await;
        let form = json!({"name": "Amina", "email": "amina@example.org"});

        let (status, _) = app.post("/api/users", None, form.clone()).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = app.post("/api/users", None, form).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);

        let (status, _) = app
            .post("/api/users", None, json!({"name": "X", "email": "not-an-email"}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
