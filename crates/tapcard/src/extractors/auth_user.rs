use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::CookieJar;

use crate::auth;
use crate::controllers::AppState;
use crate::error::AppError;
use crate::models::user;
use crate::services::users::{self, Identity};

/// Name of the cookie that may carry the identity token.
pub const SESSION_COOKIE: &str = "session";

/// Extractor that validates the identity token and resolves the caller's
/// user row, creating or refreshing it on the way.
///
/// The token is read from `Authorization: Bearer <jwt>` first, then from the
/// `session` cookie.
///
/// ```rust,ignore
/// async fn my_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
///     // user is the authenticated users row
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

fn bearer_token(parts: &Parts) -> Result<Option<String>, AppError> {
    let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".to_string()))?;
    let token = value.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Invalid Authorization header format".to_string())
    })?;
    Ok(Some(token.trim().to_string()))
}

fn session_token(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(parts)? {
            Some(token) => token,
            None => session_token(parts)
                .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?,
        };

        let claims = auth::validate_token(&token, &state.config.jwt_secret)?;
        let identity = Identity::from(&claims);
        let promote = identity
            .email
            .as_deref()
            .is_some_and(|email| state.config.is_admin_email(email));

        let user = users::upsert_user(&state.db, &identity, promote).await?;
        Ok(AuthUser(user))
    }
}
