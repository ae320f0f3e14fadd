use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One physical NFC tag in the inventory.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "nfc_tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Id printed on / burned into the chip by the manufacturer
    #[sea_orm(unique)]
    pub tag_id: String,

    pub is_verified: bool,

    pub verified_by: Option<String>,

    pub verified_at: Option<NaiveDateTime>,

    pub claimed_by: Option<i32>,

    pub claimed_at: Option<NaiveDateTime>,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ClaimedBy",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Lifecycle position of a tag: `Unverified → Verified → Claimed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TagState {
    Unverified,
    Verified,
    Claimed,
}

impl Model {
    pub fn state(&self) -> TagState {
        match (self.is_verified, self.claimed_by) {
            (_, Some(_)) => TagState::Claimed,
            (true, None) => TagState::Verified,
            (false, None) => TagState::Unverified,
        }
    }
}

// ─── Response DTO ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NfcTagResponse {
    pub id: i32,
    pub tag_id: String,
    pub state: TagState,
    pub is_verified: bool,
    pub verified_by: Option<String>,
    pub verified_at: Option<NaiveDateTime>,
    pub claimed_by: Option<i32>,
    pub claimed_at: Option<NaiveDateTime>,
}

impl From<Model> for NfcTagResponse {
    fn from(m: Model) -> Self {
        NfcTagResponse {
            id: m.id,
            state: m.state(),
            tag_id: m.tag_id,
            is_verified: m.is_verified,
            verified_by: m.verified_by,
            verified_at: m.verified_at,
            claimed_by: m.claimed_by,
            claimed_at: m.claimed_at,
        }
    }
}
