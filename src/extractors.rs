use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::{db::models::AuthUser, names, rejections::AppError, AppState};

/// Guard extractor that verifies the user session cookie against the database
/// and carries the authenticated user's info for use in handlers.
/// Unauthenticated requests are redirected to the sign-in page.
pub struct AuthGuard(pub AuthUser);

impl FromRequestParts<AppState> for AuthGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        if let Some(session_id) = jar
            .get(names::USER_SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
        {
            if let Ok(Some(user)) = state.db.get_user_by_session(&session_id).await {
                return Ok(AuthGuard(user));
            }
        }

        Err(AppError::Unauthorized)
    }
}
