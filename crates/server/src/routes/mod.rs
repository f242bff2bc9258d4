//! Route handlers for the HTTP API.

pub mod actions;
pub mod admin;
pub mod comments;
pub mod health;
pub mod locations;
pub mod notifications;
pub mod params;
pub mod reminders;
pub mod reports;
pub mod resources;
pub mod stories;
pub mod users;

use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Map search
        .route("/api/get_actions_by_country.php", get(locations::actions_by_country))
        .route("/api/get_nearby_locations.php", get(locations::nearby_locations))
        .route("/api/search_by_location.php", get(locations::search_by_location))
        // Users
        .route("/api/users", post(users::register))
        .route("/api/me", get(users::me))
        // Content
        .route("/api/actions", get(actions::list).post(actions::create))
        .route("/api/actions/:id", get(actions::show))
        .route("/api/resources", get(resources::list).post(resources::create))
        .route("/api/resources/:id", get(resources::show))
        .route("/api/stories", get(stories::list).post(stories::create))
        .route("/api/stories/:id", get(stories::show))
        .route("/api/comments", get(comments::list).post(comments::create))
        .route("/api/comments/:id", delete(comments::remove))
        // Per-user
        .route("/api/notifications", get(notifications::list))
        .route("/api/notifications/read", post(notifications::mark_read))
        .route("/api/notifications/delete", post(notifications::delete_many))
        .route("/api/reminders", get(reminders::list).post(reminders::create))
        .route("/api/reminders/:id", delete(reminders::remove))
        .route("/api/reports", post(reports::create))
        // Admin
        .route("/api/admin/stats", get(admin::stats))
        .route("/api/admin/actions/:id/status", put(admin::set_action_status))
        .route("/api/admin/resources/:id/status", put(admin::set_resource_status))
        .route("/api/admin/stories/:id/status", put(admin::set_story_status))
        .route("/api/admin/reports", get(reports::list))
        .route("/api/admin/reports/:id/status", put(reports::set_status))
}

/// The router with state, fallback and middleware applied.
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router()
        .fallback(not_found)
        .layer(middleware::from_fn(method_guard))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Endpoint not found".to_string())
}

/// Answer bare `OPTIONS` requests with an empty 200 and give 405s a JSON body.
async fn method_guard(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let response = next.run(request).await;
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        return ApiError::MethodNotAllowed.into_response();
    }
    response
}

/// Success envelope: `{"success": true, ...body}`.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

pub fn ok<T: Serialize>(body: T) -> Json<Success<T>> {
    Json(Success {
        success: true,
        body,
    })
}

/// Success envelope with `201 Created`.
pub fn created<T: Serialize>(body: T) -> (StatusCode, Json<Success<T>>) {
    (StatusCode::CREATED, ok(body))
}


#[cfg(test)]
mod tests {
    use super::test_support::TestApp;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let app = TestApp::new().await;
        let (status, body) = app.get("/api/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "message": "Endpoint not found"}));
    }

    #[tokio::test]
    async fn test_wrong_method_is_json_405() {
        let app = TestApp::new().await;
        let (status, body) = app
            .post("/api/get_nearby_locations.php", None, json!({}))
            .await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Method not allowed");
    }

    #[tokio::test]
    async fn test_options_is_empty_200() {
        let app = TestApp::new().await;
        let (status, body) = app
            .send(Method::OPTIONS, "/api/search_by_location.php", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_null());
    }

    #[tokio::test]
    async fn test_cors_header_on_every_response() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let app = TestApp::new().await;
        let request = Request::builder()
            .uri("/health")
            .header("origin", "https://peace.example.org")
            .body(Body::empty())
            .unwrap();
        let response = app.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let app = TestApp::new().await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/users")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_user_header_is_401() {
        let app = TestApp::new().await;
        let (status, body) = app.get("/api/me", Some(404)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unknown user");
    }
}
