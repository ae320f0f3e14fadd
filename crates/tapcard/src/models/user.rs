use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User entity, keyed by the identity provider's subject.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Stable id issued by the identity provider (JWT `sub`)
    #[sea_orm(unique)]
    pub subject: String,

    pub username: String,

    pub email: Option<String>,

    pub is_admin: bool,

    pub is_activated: bool,

    pub activation_date: Option<NaiveDateTime>,

    /// Email or username of the admin who activated this account
    pub activated_by: Option<String>,

    /// SHA-256 of the live QR token (never the raw token)
    #[serde(skip_serializing)]
    #[sea_orm(unique)]
    pub qr_token_hash: Option<String>,

    pub qr_token_expires_at: Option<NaiveDateTime>,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::profile::Entity")]
    Profile,
    #[sea_orm(has_many = "super::nfc_tag::Entity")]
    NfcTag,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::nfc_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NfcTag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Name used when this user acts as an admin (verifier, activator).
    pub fn identity(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.username)
    }
}

/// Public user data (safe to return in API responses).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    pub is_admin: bool,
    pub is_activated: bool,
    pub activation_date: Option<NaiveDateTime>,
    pub activated_by: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<Model> for UserResponse {
    fn from(user: Model) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
            is_activated: user.is_activated,
            activation_date: user.activation_date,
            activated_by: user.activated_by,
            created_at: user.created_at,
        }
    }
}
