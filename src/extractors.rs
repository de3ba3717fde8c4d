use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::db::models::User;
use crate::db::users;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated user, resolved from the signed session cookie.
/// Handlers that take this extractor redirect anonymous callers to the
/// login page (the rejection renders as a redirect).
#[derive(Debug, Clone)]
pub struct SessionUser(pub User);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = extract_cookie(parts, &state.config.auth.cookie_name)
            .ok_or(AppError::NotLoggedIn)?;

        // A bad signature means the cookie is treated as absent
        let user_id = state.cookies.verify(raw).ok_or(AppError::NotLoggedIn)?;

        let conn = state.db.get()?;
        users::get_by_id(&conn, user_id)?
            .map(SessionUser)
            .ok_or(AppError::NotLoggedIn)
    }
}

/// Optional variant: anonymous callers get `None` instead of a redirect.
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match SessionUser::from_request_parts(parts, state).await {
            Ok(SessionUser(user)) => Ok(MaybeUser(Some(user))),
            Err(_) => Ok(MaybeUser(None)),
        }
    }
}

fn extract_cookie<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == name {
                Some(val)
            } else {
                None
            }
        })
}
