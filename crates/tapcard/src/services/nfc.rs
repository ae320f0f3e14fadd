use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, OnConflict};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::error::AppError;
use crate::models::nfc_tag::{self, Entity as NfcTag};

const MAX_TAG_ID_LEN: usize = 128;

/// Trim a tag id and reject empty or oversized ones.
pub fn normalize_tag_id(raw: &str) -> Result<String, AppError> {
    let tag_id = raw.trim();
    if tag_id.is_empty() {
        return Err(AppError::Validation("tagId is required".to_string()));
    }
    if tag_id.len() > MAX_TAG_ID_LEN {
        return Err(AppError::Validation(format!(
            "tagId must be at most {} characters",
            MAX_TAG_ID_LEN
        )));
    }
    Ok(tag_id.to_string())
}

pub async fn get_tag_by_tag_id<C: ConnectionTrait>(
    db: &C,
    tag_id: &str,
) -> Result<Option<nfc_tag::Model>, AppError> {
    Ok(NfcTag::find()
        .filter(nfc_tag::Column::TagId.eq(tag_id.trim()))
        .one(db)
        .await?)
}

/// The tag most recently claimed by `user_id`, if any.
pub async fn get_tag_by_user_id<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Option<nfc_tag::Model>, AppError> {
    Ok(NfcTag::find()
        .filter(nfc_tag::Column::ClaimedBy.eq(user_id))
        .order_by_desc(nfc_tag::Column::ClaimedAt)
        .order_by_desc(nfc_tag::Column::Id)
        .one(db)
        .await?)
}

/// Admin inventory, newest first.
pub async fn list_tags<C: ConnectionTrait>(db: &C) -> Result<Vec<nfc_tag::Model>, AppError> {
    Ok(NfcTag::find()
        .order_by_desc(nfc_tag::Column::CreatedAt)
        .order_by_desc(nfc_tag::Column::Id)
        .all(db)
        .await?)
}

/// Record a tag as verified, inserting it if the inventory has never seen it.
///
/// Only the verification columns are touched on conflict, so an existing
/// claim survives re-verification.
pub async fn verify_tag<C: ConnectionTrait>(
    db: &C,
    raw_tag_id: &str,
    verified_by: &str,
) -> Result<nfc_tag::Model, AppError> {
    let tag_id = normalize_tag_id(raw_tag_id)?;
    let now = Utc::now().naive_utc();

    let model = nfc_tag::ActiveModel {
        tag_id: Set(tag_id.clone()),
        is_verified: Set(true),
        verified_by: Set(Some(verified_by.to_string())),
        verified_at: Set(Some(now)),
        claimed_by: Set(None),
        claimed_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    NfcTag::insert(model)
        .on_conflict(
            OnConflict::column(nfc_tag::Column::TagId)
                .update_columns([
                    nfc_tag::Column::IsVerified,
                    nfc_tag::Column::VerifiedBy,
                    nfc_tag::Column::VerifiedAt,
                    nfc_tag::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    tracing::info!(%tag_id, verified_by, "nfc tag verified");

    get_tag_by_tag_id(db, &tag_id)
        .await?
        .ok_or_else(|| AppError::Internal("Tag vanished after verification".to_string()))
}

pub async fn is_tag_verified<C: ConnectionTrait>(db: &C, tag_id: &str) -> Result<bool, AppError> {
    Ok(get_tag_by_tag_id(db, tag_id)
        .await?
        .map(|tag| tag.is_verified)
        .unwrap_or(false))
}

/// Bind a verified tag to `user_id`.
///
/// A single conditional update: it only matches when the tag is verified and
/// unclaimed (or already claimed by the same user), so two users racing for
/// one tag cannot both win. Returns `false` without writing otherwise.
pub async fn claim_tag<C: ConnectionTrait>(
    db: &C,
    tag_id: &str,
    user_id: i32,
) -> Result<bool, AppError> {
    let now = Utc::now().naive_utc();
    let result = NfcTag::update_many()
        .col_expr(nfc_tag::Column::ClaimedBy, Expr::value(user_id))
        .col_expr(
            nfc_tag::Column::ClaimedAt,
            Func::coalesce([
                Expr::col(nfc_tag::Column::ClaimedAt).into(),
                Expr::value(now).into(),
            ])
            .into(),
        )
        .col_expr(nfc_tag::Column::UpdatedAt, Expr::value(now))
        .filter(nfc_tag::Column::TagId.eq(tag_id.trim()))
        .filter(nfc_tag::Column::IsVerified.eq(true))
        .filter(
            Condition::any()
                .add(nfc_tag::Column::ClaimedBy.is_null())
                .add(nfc_tag::Column::ClaimedBy.eq(user_id)),
        )
        .exec(db)
        .await?;

    let claimed = result.rows_affected > 0;
    if claimed {
        tracing::info!(tag_id = tag_id.trim(), user_id, "nfc tag claimed");
    } else {
        tracing::debug!(tag_id = tag_id.trim(), user_id, "nfc tag claim rejected");
    }
    Ok(claimed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_ids_are_trimmed() {
        assert_eq!(normalize_tag_id("  04:A2:2B  ").unwrap(), "04:A2:2B");
    }

    #[test]
    fn blank_tag_id_is_invalid() {
        assert!(matches!(
            normalize_tag_id("   "),
            Err(AppError::Validation(_))
        ));
        assert!(normalize_tag_id(&"x".repeat(129)).is_err());
    }
}
