use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::Utc;

use crate::error::{AppError, ErrorBody};
use crate::extractors::{AuthUser, Json};
use crate::models::profile::{ProfileResponse, ProfileWithLinks, PublicProfile};
use crate::services::profiles::{self, ProfileUpdate};
use crate::services::qr::{self, IssuedQrToken};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/profiles/me", get(get_my_profile).patch(update_my_profile))
        .route("/api/profiles/qr/generate", post(generate_qr_token))
        .route("/api/public/profiles/{slug}", get(get_public_profile))
        .route("/api/public/qr/{token}", get(get_profile_by_qr_token))
}

/// Fetch the caller's profile, creating the default one on first visit.
#[utoipa::path(
    get,
    path = "/api/profiles/me",
    responses(
        (status = 200, description = "Caller's profile and links", body = ProfileWithLinks),
        (status = 401, description = "Not signed in", body = ErrorBody)
    ),
    tag = "profiles",
    security(("bearer_auth" = []))
)]
pub async fn get_my_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ProfileWithLinks>, AppError> {
    let profile = profiles::get_or_create_profile_for_user(&state.db, &user).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    patch,
    path = "/api/profiles/me",
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Invalid field values", body = ErrorBody),
        (status = 401, description = "Not signed in", body = ErrorBody),
        (status = 404, description = "Caller has no profile yet", body = ErrorBody),
        (status = 409, description = "Slug already taken", body = ErrorBody)
    ),
    tag = "profiles",
    security(("bearer_auth" = []))
)]
pub async fn update_my_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(changes): Json<ProfileUpdate>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = profiles::require_profile_for_user(&state.db, user.id).await?;
    let updated = profiles::update_profile(&state.db, profile.id, changes).await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    get,
    path = "/api/public/profiles/{slug}",
    params(("slug" = String, Path, description = "Public profile slug")),
    responses(
        (status = 200, description = "Public profile", body = PublicProfile),
        (status = 404, description = "No profile with that slug", body = ErrorBody)
    ),
    tag = "public"
)]
pub async fn get_public_profile(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PublicProfile>, AppError> {
    let profile = profiles::get_profile_by_slug(&state.db, &slug).await?;
    Ok(Json(profile))
}

/// Issue a short-lived QR token for the caller. Any previous token stops working.
#[utoipa::path(
    post,
    path = "/api/profiles/qr/generate",
    responses(
        (status = 200, description = "New token", body = IssuedQrToken),
        (status = 401, description = "Not signed in", body = ErrorBody)
    ),
    tag = "profiles",
    security(("bearer_auth" = []))
)]
pub async fn generate_qr_token(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<IssuedQrToken>, AppError> {
    let ttl = state.config.qr_token_ttl();
    let issued = qr::generate_token(&state.db, user.id, ttl).await?;
    Ok(Json(issued))
}

#[utoipa::path(
    get,
    path = "/api/public/qr/{token}",
    params(("token" = String, Path, description = "QR token")),
    responses(
        (status = 200, description = "Profile behind the token", body = PublicProfile),
        (status = 404, description = "Unknown or expired token", body = ErrorBody)
    ),
    tag = "public"
)]
pub async fn get_profile_by_qr_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<PublicProfile>, AppError> {
    let not_found = || AppError::NotFound("QR code is invalid or expired".to_string());

    let owner = qr::resolve_active_token(&state.db, &token, Utc::now())
        .await?
        .ok_or_else(not_found)?;
    let profile = profiles::get_profile_by_user_id(&state.db, owner.id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(profiles::public_view(&state.db, profile).await?))
}
