use utoipa::OpenApi;

use crate::controllers::links::ReorderRequest;
use crate::controllers::nfc::{TagCheckResponse, TagRequest};
use crate::error::{ErrorBody, FieldError};
use crate::models::link::{Icon, LinkResponse};
use crate::models::nfc_tag::{NfcTagResponse, TagState};
use crate::models::profile::{ProfileResponse, ProfileWithLinks, PublicProfile};
use crate::models::user::UserResponse;
use crate::services::links::{LinkUpdate, NewLink};
use crate::services::profiles::ProfileUpdate;
use crate::services::qr::IssuedQrToken;

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "TapCard API",
        version = "0.1.0",
        description = "Digital business cards with NFC tag claiming and QR links."
    ),
    paths(
        crate::controllers::profiles::get_my_profile,
        crate::controllers::profiles::update_my_profile,
        crate::controllers::profiles::get_public_profile,
        crate::controllers::profiles::generate_qr_token,
        crate::controllers::profiles::get_profile_by_qr_token,
        crate::controllers::links::create_link,
        crate::controllers::links::update_link,
        crate::controllers::links::delete_link,
        crate::controllers::links::reorder_links,
        crate::controllers::nfc::check_tag,
        crate::controllers::nfc::claim_tag,
        crate::controllers::nfc::my_tag,
        crate::controllers::admin::list_tags,
        crate::controllers::admin::get_tag,
        crate::controllers::admin::verify_tag,
        crate::controllers::admin::list_users,
        crate::controllers::admin::activate_user,
    ),
    components(
        schemas(
            ProfileResponse,
            ProfileWithLinks,
            PublicProfile,
            ProfileUpdate,
            LinkResponse,
            Icon,
            NewLink,
            LinkUpdate,
            ReorderRequest,
            NfcTagResponse,
            TagState,
            TagRequest,
            TagCheckResponse,
            UserResponse,
            IssuedQrToken,
            ErrorBody,
            FieldError,
        )
    ),
    tags(
        (name = "profiles", description = "The caller's own card"),
        (name = "links", description = "Links on the caller's card"),
        (name = "nfc", description = "NFC tag checks and claiming"),
        (name = "public", description = "Unauthenticated profile views"),
        (name = "admin", description = "Tag inventory and account activation")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Register the JWT bearer security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            );
        }
    }
}
