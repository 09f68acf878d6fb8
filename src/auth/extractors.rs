use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use tracing::warn;

use crate::auth::{
    cookies::{read_cookie, ACCESS_COOKIE},
    dto::PublicUser,
    jwt::{JwtKeys, TokenKind},
    repo_types::User,
};
use crate::state::AppState;

/// Request gate for operations that need an authenticated actor. Resolves the
/// access-token cookie into the current user (password blanked) and fails
/// closed with 401 on a missing cookie, a bad token, or a missing account.
pub struct CurrentUser(pub PublicUser);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = read_cookie(&parts.headers, ACCESS_COOKIE)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized request".to_string()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(&token, TokenKind::Access).map_err(|_| {
            warn!("invalid or expired access token");
            (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired token".to_string(),
            )
        })?;

        let user = User::find_by_email(&state.db, &claims.email)
            .await
            .map_err(|e| {
                warn!(error = %e, "user lookup failed");
                (StatusCode::UNAUTHORIZED, "Unauthorized request".to_string())
            })?
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized request".to_string()))?;

        Ok(CurrentUser(user.into_public()))
    }
}
