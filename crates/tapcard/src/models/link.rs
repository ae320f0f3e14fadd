use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Link entity: one contact/social link on a profile.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "links")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub profile_id: i32,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub url: String,

    /// Free-text icon tag, e.g. "instagram". See [`Icon::from_tag`].
    pub icon: String,

    /// Rank within the profile; `order` on the wire.
    pub sort_order: i32,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::ProfileId",
        to = "super::profile::Column::Id"
    )]
    Profile,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Icons the client knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    Instagram,
    Linkedin,
    Github,
    Twitter,
    Youtube,
    Tiktok,
    Facebook,
    Twitch,
    Default,
}

impl Icon {
    /// Case-insensitive match of a stored icon tag; unknown tags fall back to `Default`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "instagram" => Icon::Instagram,
            "linkedin" => Icon::Linkedin,
            "github" => Icon::Github,
            "twitter" => Icon::Twitter,
            "youtube" => Icon::Youtube,
            "tiktok" => Icon::Tiktok,
            "facebook" => Icon::Facebook,
            "twitch" => Icon::Twitch,
            _ => Icon::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Instagram => "instagram",
            Icon::Linkedin => "linkedin",
            Icon::Github => "github",
            Icon::Twitter => "twitter",
            Icon::Youtube => "youtube",
            Icon::Tiktok => "tiktok",
            Icon::Facebook => "facebook",
            Icon::Twitch => "twitch",
            Icon::Default => "default",
        }
    }
}

// ─── Response DTO ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: i32,
    pub profile_id: i32,
    pub title: String,
    pub url: String,
    pub icon: String,
    /// `icon` resolved against the known icon set
    pub icon_key: Icon,
    pub order: i32,
}

impl From<Model> for LinkResponse {
    fn from(m: Model) -> Self {
        LinkResponse {
            id: m.id,
            profile_id: m.profile_id,
            icon_key: Icon::from_tag(&m.icon),
            title: m.title,
            url: m.url,
            icon: m.icon,
            order: m.sort_order,
        }
    }
}
