//! Per-request caller identity.
//!
//! The caller names themselves with the `X-User-Id` header. The id is
//! resolved against `users`; a missing header means an anonymous caller and
//! an unknown or malformed id is rejected with 401.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use database::{user, DatabaseError, Role, User};

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The caller of the current request, if any.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    user: Option<User>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn user(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The caller, or 401 when anonymous.
    pub fn require_user(&self) -> Result<&User> {
        self.user
            .as_ref()
            .ok_or_else(|| ApiError::Unauthorized("Login required".to_string()))
    }

    pub fn is_admin(&self) -> bool {
        matches!(&self.user, Some(u) if u.role == Role::Admin)
    }

    pub fn is_owner(&self, user_id: i64) -> bool {
        matches!(&self.user, Some(u) if u.id == user_id)
    }

    /// The caller if they are an admin; 401 when anonymous, 403 otherwise.
    pub fn require_admin(&self) -> Result<&User> {
        let user = self.require_user()?;
        if user.role != Role::Admin {
            return Err(ApiError::Forbidden("Admin access required".to_string()));
        }
        Ok(user)
    }

    /// The caller if they own the record or are an admin.
    pub fn require_owner_or_admin(&self, owner_id: i64) -> Result<&User> {
        let user = self.require_user()?;
        if user.id != owner_id && user.role != Role::Admin {
            return Err(ApiError::Forbidden(
                "You do not have permission to modify this record".to_string(),
            ));
        }
        Ok(user)
    }

    /// Whether the caller may see a record that is not yet approved.
    pub fn can_see_unpublished(&self, owner_id: i64) -> bool {
        self.is_owner(owner_id) || self.is_admin()
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let Some(raw) = parts.headers.get(USER_ID_HEADER) else {
            return Ok(Identity::anonymous());
        };

        let id = raw
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .ok_or_else(|| ApiError::Unauthorized("Invalid X-User-Id header".to_string()))?;

        match user::get_user(state.db.pool(), id).await {
            Ok(user) => Ok(Identity::user(user)),
            Err(DatabaseError::NotFound { .. }) => {
                Err(ApiError::Unauthorized("Unknown user".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn member(id: i64, role: Role) -> User {
        User {
            id,
            name: "Member".to_string(),
            email: format!("member{id}@example.org"),
            role,
            created_at: "2025-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_anonymous() {
        let identity = Identity::anonymous();
        assert!(identity.current_user().is_none());
        assert!(!identity.is_admin());
        assert!(!identity.is_owner(1));
        assert_eq!(identity.require_user().unwrap_err().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(identity.require_admin().unwrap_err().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_owner_and_admin_capabilities() {
        let owner = Identity::user(member(1, Role::User));
        assert!(owner.is_owner(1));
        assert!(!owner.is_owner(2));
        assert!(owner.require_owner_or_admin(1).is_ok());
        assert_eq!(
            owner.require_owner_or_admin(2).unwrap_err().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(owner.require_admin().unwrap_err().status(), StatusCode::FORBIDDEN);

        let admin = Identity::user(member(9, Role::Admin));
        assert!(admin.is_admin());
        assert!(admin.require_owner_or_admin(1).is_ok());
        assert!(admin.can_see_unpublished(1));
        assert!(!Identity::user(member(3, Role::User)).can_see_unpublished(1));
    }
}
