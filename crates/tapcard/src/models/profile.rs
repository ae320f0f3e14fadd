use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::link::LinkResponse;

pub const DEFAULT_BIO: &str = "Welcome to my digital card!";
pub const DEFAULT_THEME_COLOR: &str = "#000000";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";

/// Profile entity: the public card. One per user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub user_id: i32,

    pub display_name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    pub phone: Option<String>,

    #[sea_orm(unique)]
    pub slug: String,

    pub avatar_url: Option<String>,

    pub theme_color: String,

    pub background_color: String,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::link::Entity")]
    Link,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Link.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ─── Response DTOs ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: i32,
    pub user_id: i32,
    pub display_name: String,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub slug: String,
    pub avatar_url: Option<String>,
    pub theme_color: String,
    pub background_color: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Model> for ProfileResponse {
    fn from(m: Model) -> Self {
        ProfileResponse {
            id: m.id,
            user_id: m.user_id,
            display_name: m.display_name,
            bio: m.bio,
            phone: m.phone,
            slug: m.slug,
            avatar_url: m.avatar_url,
            theme_color: m.theme_color,
            background_color: m.background_color,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// The caller's own profile together with its ordered links.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileWithLinks {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    pub links: Vec<LinkResponse>,
}

/// What anyone holding the slug (or a live QR token) gets to see.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    pub links: Vec<LinkResponse>,
    pub is_activated: bool,
}
