//! Actor resolution and role gating.
//!
//! The login service itself is an external collaborator; this module only
//! resolves `Authorization: Bearer <token>` against the user directory and
//! exposes an explicit per-route role guard. The resolved actor is threaded
//! into every workflow call as an argument, never read from ambient state.

use axum::{extract::FromRequestParts, http::request::Parts};

use covitrack_core::models::{Role, User};

use crate::{error::ApiError, state::AppState};

/// The authenticated actor for one request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    /// Guard: reject unless the actor holds the role this route requires.
    pub fn require_role(self, required: Role) -> Result<User, ApiError> {
        if self.0.role != required {
            return Err(ApiError::forbidden(format!(
                "role {} required",
                required.as_str()
            )));
        }
        Ok(self.0)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;

        let user = state
            .db()?
            .get_user(&token)
            .map_err(|e| ApiError::internal(e.to_string()))?
            .ok_or_else(|| ApiError::unauthorized("unknown token"))?;

        Ok(AuthUser(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_role_passes_matching_role() {
        let user = User::new("tester".into(), Role::Tester);
        let actor = AuthUser(user.clone()).require_role(Role::Tester).unwrap();
        assert_eq!(actor.id, user.id);
    }

    #[test]
    fn require_role_rejects_other_roles() {
        let user = User::new("doctor".into(), Role::Doctor);
        let result = AuthUser(user).require_role(Role::Tester);
        assert!(result.is_err());
    }
}
