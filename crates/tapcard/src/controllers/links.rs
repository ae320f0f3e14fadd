use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{patch, post},
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, ErrorBody};
use crate::extractors::{AuthUser, Json};
use crate::models::link::LinkResponse;
use crate::services::links::{self, LinkUpdate, NewLink};
use crate::services::profiles;

use super::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    /// Link ids in their new order. Omitted links keep their relative order after these.
    pub link_ids: Vec<i32>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/links", post(create_link))
        .route("/api/links/reorder", post(reorder_links))
        .route("/api/links/{id}", patch(update_link).delete(delete_link))
}

#[utoipa::path(
    post,
    path = "/api/links",
    request_body = NewLink,
    responses(
        (status = 201, description = "Link created", body = LinkResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 401, description = "Not signed in", body = ErrorBody),
        (status = 404, description = "Caller has no profile yet", body = ErrorBody)
    ),
    tag = "links",
    security(("bearer_auth" = []))
)]
pub async fn create_link(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<NewLink>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let profile = profiles::require_profile_for_user(&state.db, user.id).await?;
    let link = links::create_link(&state.db, profile.id, payload).await?;
    Ok((StatusCode::CREATED, Json(link.into())))
}

#[utoipa::path(
    patch,
    path = "/api/links/{id}",
    params(("id" = i32, Path, description = "Link id")),
    request_body = LinkUpdate,
    responses(
        (status = 200, description = "Link updated", body = LinkResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 401, description = "Not signed in", body = ErrorBody),
        (status = 404, description = "No such link on the caller's profile", body = ErrorBody)
    ),
    tag = "links",
    security(("bearer_auth" = []))
)]
pub async fn update_link(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    Json(changes): Json<LinkUpdate>,
) -> Result<Json<LinkResponse>, AppError> {
    let profile = profiles::require_profile_for_user(&state.db, user.id).await?;
    let link = links::update_link(&state.db, profile.id, id, changes).await?;
    Ok(Json(link.into()))
}

#[utoipa::path(
    delete,
    path = "/api/links/{id}",
    params(("id" = i32, Path, description = "Link id")),
    responses(
        (status = 204, description = "Link deleted"),
        (status = 401, description = "Not signed in", body = ErrorBody),
        (status = 404, description = "No such link on the caller's profile", body = ErrorBody)
    ),
    tag = "links",
    security(("bearer_auth" = []))
)]
pub async fn delete_link(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let profile = profiles::require_profile_for_user(&state.db, user.id).await?;
    links::delete_link(&state.db, profile.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/links/reorder",
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "All links in their new order", body = [LinkResponse]),
        (status = 400, description = "Duplicate ids", body = ErrorBody),
        (status = 401, description = "Not signed in", body = ErrorBody),
        (status = 404, description = "An id is not on the caller's profile", body = ErrorBody)
    ),
    tag = "links",
    security(("bearer_auth" = []))
)]
pub async fn reorder_links(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<ReorderRequest>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let profile = profiles::require_profile_for_user(&state.db, user.id).await?;
    let links = links::reorder_links(&state.db, profile.id, &payload.link_ids).await?;
    Ok(Json(links.into_iter().map(LinkResponse::from).collect()))
}
