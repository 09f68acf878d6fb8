use axum::{
    extract::{FromRef, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::{
    cookies::{clear_token_cookies, read_cookie, set_token_cookies, ACCESS_COOKIE, REFRESH_COOKIE},
    dto::{AuthOutcome, LoginRequest, LogoutRequest, SignUpRequest},
    jwt::JwtKeys,
    service,
};
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/signup", post(sign_up))
        .route("/auth/signup/confirm", post(continue_sign_up))
        .route("/auth/logout", post(logout))
        .route("/auth/refresh", post(refresh))
        .route("/auth/session", get(check_auth))
}

/// Translate an operation outcome into an HTTP response: mirror the status
/// code, set token cookies when the outcome carries a fresh pair.
fn respond(state: &AppState, outcome: AuthOutcome) -> Response {
    let mut headers = HeaderMap::new();
    if let (Some(access), Some(refresh)) = (&outcome.access_token, &outcome.refresh_token) {
        let keys = JwtKeys::from_ref(state);
        set_token_cookies(
            &mut headers,
            access,
            refresh,
            keys.access_ttl.as_secs(),
            keys.refresh_ttl.as_secs(),
            state.config.cookie_secure,
        );
    }
    let status = StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, headers, Json(outcome)).into_response()
}

#[instrument(skip(state, payload))]
pub async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> Response {
    let outcome = service::login(&state, payload).await;
    respond(&state, outcome)
}

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> Response {
    let outcome = service::sign_up(&state, payload).await;
    respond(&state, outcome)
}

#[instrument(skip(state, payload))]
pub async fn continue_sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> Response {
    let outcome = service::continue_sign_up(&state, payload).await;
    respond(&state, outcome)
}

/// Cookies are deleted even when clearing the stored refresh token fails.
#[instrument(skip(state, payload))]
pub async fn logout(State(state): State<AppState>, Json(payload): Json<LogoutRequest>) -> Response {
    let outcome = service::logout(&state, payload.id).await;
    let mut headers = HeaderMap::new();
    clear_token_cookies(&mut headers, state.config.cookie_secure);
    let status = StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, headers, Json(outcome)).into_response()
}

#[instrument(skip(state, headers))]
pub async fn check_auth(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let token = read_cookie(&headers, ACCESS_COOKIE);
    let outcome = service::check_auth(&state, token.as_deref()).await;
    respond(&state, outcome)
}

#[instrument(skip(state, headers))]
pub async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let token = read_cookie(&headers, REFRESH_COOKIE);
    let outcome = service::refresh_session(&state, token.as_deref()).await;
    respond(&state, outcome)
}
