use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};
use crate::extractors::{AuthUser, Json};
use crate::models::nfc_tag::NfcTagResponse;
use crate::services::nfc;

use super::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagRequest {
    pub tag_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagCheckResponse {
    pub is_verified: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/nfc/check/{tag_id}", get(check_tag))
        .route("/api/nfc/claim", post(claim_tag))
        .route("/api/nfc/me", get(my_tag))
}

#[utoipa::path(
    get,
    path = "/api/nfc/check/{tag_id}",
    params(("tag_id" = String, Path, description = "Chip id")),
    responses(
        (status = 200, description = "Verification state", body = TagCheckResponse)
    ),
    tag = "nfc"
)]
pub async fn check_tag(
    State(state): State<AppState>,
    Path(tag_id): Path<String>,
) -> Result<Json<TagCheckResponse>, AppError> {
    let is_verified = nfc::is_tag_verified(&state.db, &tag_id).await?;
    Ok(Json(TagCheckResponse { is_verified }))
}

/// Bind a verified tag to the caller.
#[utoipa::path(
    post,
    path = "/api/nfc/claim",
    request_body = TagRequest,
    responses(
        (status = 200, description = "Tag claimed", body = NfcTagResponse),
        (status = 400, description = "Tag is not verified", body = ErrorBody),
        (status = 401, description = "Not signed in", body = ErrorBody),
        (status = 404, description = "Unknown tag", body = ErrorBody),
        (status = 409, description = "Tag belongs to someone else", body = ErrorBody)
    ),
    tag = "nfc",
    security(("bearer_auth" = []))
)]
pub async fn claim_tag(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<TagRequest>,
) -> Result<Json<NfcTagResponse>, AppError> {
    let tag_id = nfc::normalize_tag_id(&payload.tag_id)?;

    if !nfc::claim_tag(&state.db, &tag_id, user.id).await? {
        // Explain the refusal; the write itself never raced.
        return Err(match nfc::get_tag_by_tag_id(&state.db, &tag_id).await? {
            None => AppError::NotFound(format!("Tag {} not found", tag_id)),
            Some(tag) if !tag.is_verified => {
                AppError::Validation(format!("Tag {} is not verified", tag_id))
            }
            Some(_) => AppError::Conflict(format!("Tag {} is already claimed", tag_id)),
        });
    }

    let tag = nfc::get_tag_by_tag_id(&state.db, &tag_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tag {} not found", tag_id)))?;
    Ok(Json(tag.into()))
}

#[utoipa::path(
    get,
    path = "/api/nfc/me",
    responses(
        (status = 200, description = "Caller's most recently claimed tag", body = NfcTagResponse),
        (status = 401, description = "Not signed in", body = ErrorBody),
        (status = 404, description = "Caller has not claimed a tag", body = ErrorBody)
    ),
    tag = "nfc",
    security(("bearer_auth" = []))
)]
pub async fn my_tag(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<NfcTagResponse>, AppError> {
    let tag = nfc::get_tag_by_user_id(&state.db, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No tag claimed".to_string()))?;
    Ok(Json(tag.into()))
}
