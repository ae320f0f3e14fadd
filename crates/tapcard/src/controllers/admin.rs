//! Admin console: NFC inventory and account activation.
//!
//! Every handler takes [`AdminUser`], so authorization lives in one place.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::error::{AppError, ErrorBody};
use crate::extractors::{AdminUser, Json};
use crate::models::nfc_tag::NfcTagResponse;
use crate::models::user::UserResponse;
use crate::services::{nfc, users};

use super::AppState;
use super::nfc::TagRequest;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/tags", get(list_tags))
        .route("/api/admin/tags/{tag_id}", get(get_tag))
        .route("/api/admin/verify-tag", post(verify_tag))
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/activate/{user_id}", post(activate_user))
}

#[utoipa::path(
    get,
    path = "/api/admin/tags",
    responses(
        (status = 200, description = "All tags, newest first", body = [NfcTagResponse]),
        (status = 401, description = "Not signed in", body = ErrorBody),
        (status = 403, description = "Not an admin", body = ErrorBody)
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn list_tags(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<NfcTagResponse>>, AppError> {
    let tags = nfc::list_tags(&state.db).await?;
    Ok(Json(tags.into_iter().map(NfcTagResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/admin/tags/{tag_id}",
    params(("tag_id" = String, Path, description = "Chip id")),
    responses(
        (status = 200, description = "Tag", body = NfcTagResponse),
        (status = 403, description = "Not an admin", body = ErrorBody),
        (status = 404, description = "Unknown tag", body = ErrorBody)
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn get_tag(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(tag_id): Path<String>,
) -> Result<Json<NfcTagResponse>, AppError> {
    let tag = nfc::get_tag_by_tag_id(&state.db, &tag_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tag {} not found", tag_id.trim())))?;
    Ok(Json(tag.into()))
}

#[utoipa::path(
    post,
    path = "/api/admin/verify-tag",
    request_body = TagRequest,
    responses(
        (status = 200, description = "Tag verified", body = NfcTagResponse),
        (status = 400, description = "Missing tag id", body = ErrorBody),
        (status = 403, description = "Not an admin", body = ErrorBody)
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn verify_tag(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<TagRequest>,
) -> Result<Json<NfcTagResponse>, AppError> {
    let tag = nfc::verify_tag(&state.db, &payload.tag_id, admin.identity()).await?;
    Ok(Json(tag.into()))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 403, description = "Not an admin", body = ErrorBody)
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = users::list_users(&state.db).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/admin/activate/{user_id}",
    params(("user_id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User activated", body = UserResponse),
        (status = 403, description = "Not an admin", body = ErrorBody),
        (status = 404, description = "Unknown user", body = ErrorBody)
    ),
    tag = "admin",
    security(("bearer_auth" = []))
)]
pub async fn activate_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    let user = users::activate_user(&state.db, user_id, admin.identity()).await?;
    Ok(Json(user.into()))
}
