//! Session extraction for authenticated routes

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use arcadia_core::PublicUser;

use crate::cookie;
use crate::envelope::ApiError;
use crate::state::AppState;

/// The authenticated caller, resolved from the session cookie
///
/// The session token is validated against the sessions table and the
/// user row is re-fetched on every call, so the admin flag is never
/// trusted from the session itself.
pub struct CurrentUser(pub PublicUser);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie::extract_cookie(&parts.headers, &state.config.session_cookie)
            .ok_or(ApiError::Unauthorized("Authentication required"))?;

        let db = state.db();
        let session = db
            .users()
            .find_valid_session(&token)?
            .ok_or(ApiError::Unauthorized("Authentication required"))?;
        let user = db
            .users()
            .find_public_by_id(session.user_id)?
            .ok_or(ApiError::Unauthorized("Authentication required"))?;

        Ok(CurrentUser(user))
    }
}

/// An authenticated administrator
pub struct AdminUser(pub PublicUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(ApiError::Forbidden);
        }
        Ok(AdminUser(user))
    }
}
