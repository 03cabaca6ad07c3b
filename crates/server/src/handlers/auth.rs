//! Authentication handlers

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::cookie;
use crate::envelope::{ApiError, ApiResult, Envelope};
use crate::session::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
}

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let username = req.username.trim();
    let user_id = state
        .db()
        .users()
        .register(username, req.email.trim(), &req.password)?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_data(
            "User created",
            json!({ "user_id": user_id, "username": username }),
        )),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email
    login: String,
    password: String,
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let db = state.db();
    let user = db
        .users()
        .authenticate(req.login.trim(), &req.password)?
        .ok_or(ApiError::Unauthorized("Invalid credentials"))?;
    let session = db
        .users()
        .create_session(user.id, state.config.session_ttl_days)?;
    drop(db);

    let cookie = cookie::build_session_cookie(
        &state.config.session_cookie,
        &session.token,
        state.config.session_ttl_secs(),
        state.config.cookie_secure,
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(Envelope::with_data(
            "Login successful",
            json!({ "user": user }),
        )),
    ))
}

/// POST /api/logout
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    if let Some(token) = cookie::extract_cookie(&headers, &state.config.session_cookie) {
        state.db().users().delete_session(&token)?;
    }

    Ok((
        [(
            header::SET_COOKIE,
            cookie::build_clear_cookie(&state.config.session_cookie),
        )],
        Json(Envelope::ok("Logged out")),
    ))
}

/// GET /api/me
pub async fn me(CurrentUser(user): CurrentUser) -> ApiResult<impl IntoResponse> {
    Ok(Json(Envelope::with_data(
        "Current user",
        json!({ "user": user }),
    )))
}
