//! Auth operations: login, two-phase signup, logout, session check, refresh.
//!
//! Every operation resolves to a uniform [`AuthOutcome`] instead of an error
//! type; unexpected storage or signing failures are caught here, logged, and
//! reported as a generic failure so nothing propagates as an unhandled fault.

use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, warn};

use crate::auth::{
    dto::{AuthOutcome, LoginRequest, SignUpRequest},
    jwt::{JwtKeys, TokenError, TokenKind},
    password::{hash_password, verify_password},
    repo_types::User,
};
use crate::state::AppState;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Shape validation shared by login and signup. Returns the first problem as
/// a user-facing message; runs before any storage access.
pub(crate) fn validate_credentials(
    email: &str,
    name: Option<&str>,
    password: &str,
) -> Result<(), String> {
    if !is_valid_email(email) {
        return Err("Invalid email".into());
    }
    if let Some(name) = name {
        if name.chars().count() < 2 {
            return Err("Name must be at least 2 characters".into());
        }
    }
    if password.chars().count() < 6 {
        return Err("Password must be at least 6 characters".into());
    }
    Ok(())
}

fn issue_tokens(keys: &JwtKeys, user: &User) -> anyhow::Result<(String, String)> {
    let access = keys.sign_access(user.id, user.name.as_deref(), &user.email)?;
    let refresh = keys.sign_refresh(user.id, user.name.as_deref(), &user.email)?;
    Ok((access, refresh))
}

/// Mint a token pair, persist the refresh token, and build the logged-in
/// outcome. The stored refresh token is the single server-side revocation
/// handle; concurrent logins race to overwrite it, last writer wins.
async fn establish_session(
    state: &AppState,
    user: User,
    message: &str,
) -> anyhow::Result<AuthOutcome> {
    let keys = JwtKeys::from_ref(state);
    let (access_token, refresh_token) = issue_tokens(&keys, &user)?;
    User::set_refresh_token(&state.db, user.id, &refresh_token).await?;
    info!(user_id = %user.id, email = %user.email, "session established");
    Ok(AuthOutcome::logged_in(
        message,
        user.into_public(),
        access_token,
        refresh_token,
    ))
}

pub async fn login(state: &AppState, credentials: LoginRequest) -> AuthOutcome {
    if let Err(message) = validate_credentials(&credentials.email, None, &credentials.password) {
        warn!(email = %credentials.email, "login validation failed");
        return AuthOutcome::new(403, message);
    }
    match try_login(state, &credentials).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "login failed");
            AuthOutcome::new(404, "Some error occurred")
        }
    }
}

async fn try_login(state: &AppState, credentials: &LoginRequest) -> anyhow::Result<AuthOutcome> {
    let Some(user) = User::find_by_email(&state.db, &credentials.email).await? else {
        warn!(email = %credentials.email, "login unknown email");
        return Ok(AuthOutcome::new(
            302,
            "User does not exist, kindly sign up first",
        ));
    };

    if !verify_password(&credentials.password, &user.password_hash)? {
        warn!(email = %credentials.email, user_id = %user.id, "login invalid password");
        return Ok(AuthOutcome::new(401, "Invalid user credentials"));
    }

    establish_session(state, user, "User successfully logged in").await
}

/// Signup phase 1: validate and defer persistence. A brand-new email gets a
/// 201 telling the caller to run the OTP flow; no row is created and the
/// submitted credentials are never echoed back. An already-registered email
/// falls back to password verification and behaves like login.
pub async fn sign_up(state: &AppState, credentials: SignUpRequest) -> AuthOutcome {
    let Some(name) = credentials.name.as_deref().filter(|n| !n.is_empty()) else {
        warn!(email = %credentials.email, "signup missing name");
        return AuthOutcome::new(403, "Name is required to sign up");
    };
    if let Err(message) =
        validate_credentials(&credentials.email, Some(name), &credentials.password)
    {
        warn!(email = %credentials.email, "signup validation failed");
        return AuthOutcome::new(403, message);
    }
    match try_sign_up(state, &credentials).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "signup failed");
            AuthOutcome::new(404, "Some error occurred")
        }
    }
}

async fn try_sign_up(state: &AppState, credentials: &SignUpRequest) -> anyhow::Result<AuthOutcome> {
    let Some(user) = User::find_by_email(&state.db, &credentials.email).await? else {
        return Ok(AuthOutcome::new(
            201,
            "Kindly enter the OTP sent to your email",
        ));
    };

    if !verify_password(&credentials.password, &user.password_hash)? {
        warn!(email = %credentials.email, "signup for existing account, wrong password");
        return Ok(AuthOutcome::new(
            401,
            "User already exists, but could not login due to invalid credentials",
        ));
    }

    establish_session(state, user, "User already existed and was logged in").await
}

/// Signup phase 2: the caller has passed the OTP gate, so materialize the
/// row. No duplicate-email re-check happens here; the unique constraint on
/// `users.email` is the hard invariant, and a violation lands in the generic
/// failure path without ever creating a second row.
pub async fn continue_sign_up(state: &AppState, credentials: SignUpRequest) -> AuthOutcome {
    match try_continue_sign_up(state, &credentials).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "continue signup failed");
            AuthOutcome::new(404, "Some error occurred")
        }
    }
}

async fn try_continue_sign_up(
    state: &AppState,
    credentials: &SignUpRequest,
) -> anyhow::Result<AuthOutcome> {
    let safe_password = hash_password(&credentials.password)?;
    // Create first so the token claims carry the real id.
    let user = User::create(
        &state.db,
        &credentials.email,
        credentials.name.as_deref(),
        &safe_password,
    )
    .await?;
    establish_session(state, user, "User successfully created").await
}

/// Clear the stored refresh token. Cookie deletion is the handler's job and
/// happens regardless of this outcome.
pub async fn logout(state: &AppState, user_id: i64) -> AuthOutcome {
    match User::clear_refresh_token(&state.db, user_id).await {
        Ok(true) => {
            info!(%user_id, "user logged out");
            AuthOutcome::new(200, "You are successfully logged out")
        }
        Ok(false) => {
            warn!(%user_id, "logout for unknown user");
            AuthOutcome::new(404, "Could not logout")
        }
        Err(e) => {
            error!(error = %e, %user_id, "logout failed");
            AuthOutcome::new(404, "Could not logout")
        }
    }
}

/// Resolve the current session from the access-token cookie value.
pub async fn check_auth(state: &AppState, access_token: Option<&str>) -> AuthOutcome {
    let Some(token) = access_token else {
        return AuthOutcome::new(401, "Unauthorized request");
    };

    let keys = JwtKeys::from_ref(state);
    let claims = match keys.verify(token, TokenKind::Access) {
        Ok(claims) => claims,
        Err(TokenError::Expired) => {
            return AuthOutcome::new(403, "Unauthorized access, kindly re-login");
        }
        Err(TokenError::Invalid) => {
            warn!("invalid access token");
            return AuthOutcome::new(401, "Invalid access token");
        }
    };

    match User::find_by_email(&state.db, &claims.email).await {
        // Covers accounts deleted or renamed since the token was issued.
        Ok(None) => AuthOutcome::new(401, "Invalid access token"),
        Ok(Some(user)) => {
            let mut outcome = AuthOutcome::new(200, "User successfully logged in");
            outcome.user = Some(user.into_public());
            outcome
        }
        Err(e) => {
            error!(error = %e, "check_auth lookup failed");
            AuthOutcome::new(500, "Some error occurred at our end, please try again")
        }
    }
}

/// Rotate the token pair from the refresh-token cookie. The presented token
/// must match the one recorded on the user row; logout nulls that column,
/// which is the only server-side revocation mechanism.
pub async fn refresh_session(state: &AppState, refresh_token: Option<&str>) -> AuthOutcome {
    let Some(token) = refresh_token else {
        return AuthOutcome::new(401, "Unauthorized request");
    };

    let keys = JwtKeys::from_ref(state);
    let claims = match keys.verify(token, TokenKind::Refresh) {
        Ok(claims) => claims,
        Err(TokenError::Expired) => {
            return AuthOutcome::new(403, "Unauthorized access, kindly re-login");
        }
        Err(TokenError::Invalid) => {
            warn!("invalid refresh token");
            return AuthOutcome::new(401, "Invalid refresh token");
        }
    };

    match try_refresh(state, &claims.email, token).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "refresh failed");
            AuthOutcome::new(500, "Some error occurred at our end, please try again")
        }
    }
}

async fn try_refresh(
    state: &AppState,
    email: &str,
    presented: &str,
) -> anyhow::Result<AuthOutcome> {
    let Some(user) = User::find_by_email(&state.db, email).await? else {
        return Ok(AuthOutcome::new(401, "Invalid refresh token"));
    };
    if user.refresh_token.as_deref() != Some(presented) {
        warn!(user_id = %user.id, "refresh token revoked or superseded");
        return Ok(AuthOutcome::new(401, "Invalid refresh token"));
    }
    establish_session(state, user, "Session refreshed").await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("jane@example.com"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@example.com"));
    }

    #[test]
    fn credential_validation_short_circuits() {
        assert!(validate_credentials("jane@example.com", None, "secret1").is_ok());
        assert_eq!(
            validate_credentials("bad", None, "secret1").unwrap_err(),
            "Invalid email"
        );
        assert_eq!(
            validate_credentials("jane@example.com", Some("J"), "secret1").unwrap_err(),
            "Name must be at least 2 characters"
        );
        assert_eq!(
            validate_credentials("jane@example.com", None, "12345").unwrap_err(),
            "Password must be at least 6 characters"
        );
    }

    #[tokio::test]
    async fn login_rejects_malformed_input_before_storage() {
        // The test pool never connects; reaching storage would error with 404,
        // so a 403 proves validation ran first.
        let state = AppState::test();
        let outcome = login(
            &state,
            LoginRequest {
                email: "jane@example.com".into(),
                password: "12345".into(),
            },
        )
        .await;
        assert_eq!(outcome.status, 403);
    }

    #[tokio::test]
    async fn sign_up_requires_a_name() {
        let state = AppState::test();
        let outcome = sign_up(
            &state,
            SignUpRequest {
                email: "jane@example.com".into(),
                name: None,
                password: "secret1".into(),
            },
        )
        .await;
        assert_eq!(outcome.status, 403);
    }

    #[tokio::test]
    async fn check_auth_without_cookie_is_unauthorized() {
        let state = AppState::test();
        let outcome = check_auth(&state, None).await;
        assert_eq!(outcome.status, 401);
        assert!(outcome.user.is_none());
    }

    #[tokio::test]
    async fn check_auth_distinguishes_expired_from_malformed() {
        let state = AppState::test();

        let outcome = check_auth(&state, Some("definitely.not.a-jwt")).await;
        assert_eq!(outcome.status, 401);

        // An expired token gets the re-login signal instead.
        use crate::auth::jwt::Claims;
        use jsonwebtoken::{encode, EncodingKey, Header};
        let now = time::OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: 1,
            name: None,
            email: "jane@example.com".into(),
            iat: (now - 7200) as usize,
            exp: (now - 3600) as usize,
            iss: "test-issuer".into(),
            aud: "test-aud".into(),
            kind: TokenKind::Access,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-access-secret"),
        )
        .unwrap();
        let outcome = check_auth(&state, Some(&token)).await;
        assert_eq!(outcome.status, 403);
    }

    #[tokio::test]
    async fn refresh_rejects_access_tokens() {
        let state = AppState::test();
        let keys = JwtKeys::from_ref(&state);
        let access = keys.sign_access(1, None, "jane@example.com").unwrap();
        let outcome = refresh_session(&state, Some(&access)).await;
        assert_eq!(outcome.status, 401);
    }
}
