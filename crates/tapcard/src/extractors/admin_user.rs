use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth;
use crate::controllers::AppState;
use crate::error::AppError;
use crate::models::user;

use super::AuthUser;

/// An authenticated caller that passed [`auth::require_admin`].
/// Missing or bad credentials reject with 401, non-admins with 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub user::Model);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        auth::require_admin(&user)?;
        Ok(AdminUser(user))
    }
}
