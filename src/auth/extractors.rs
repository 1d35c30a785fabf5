use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::{jwt::JwtKeys, repo::User};
use crate::{error::ApiError, state::AppState};

/// Resolves the request's bearer token into the authenticated user.
///
/// Stateless: the token is verified and the user re-loaded on every request.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthenticated("Missing Authorization header".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::Unauthenticated("Invalid Authorization header".into()))?;

        // Bad signature, expiry and malformed tokens all collapse to the same
        // client-visible outcome.
        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::Unauthenticated("Invalid authentication credentials".into())
        })?;

        let user = User::find_by_email(&state.db, &claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(email = %claims.sub, "token for unknown user");
                ApiError::Unauthenticated("User not found".into())
            })?;

        Ok(CurrentUser(user))
    }
}
