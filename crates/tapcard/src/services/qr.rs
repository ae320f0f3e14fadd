use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{generate_secure_token, hash_token};
use crate::error::AppError;
use crate::models::user::{self, Entity as User};
use crate::services::users;

/// A freshly issued QR token. The raw token is only ever returned here;
/// the database keeps its hash.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuedQrToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issue a new QR token for `user_id`, replacing any previous one.
pub async fn generate_token<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    ttl: Duration,
) -> Result<IssuedQrToken, AppError> {
    let user = users::find_by_id(db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    let token = generate_secure_token();
    let now = Utc::now();
    let expires_at = now + ttl;

    let mut active: user::ActiveModel = user.into();
    active.qr_token_hash = Set(Some(hash_token(&token)));
    active.qr_token_expires_at = Set(Some(expires_at.naive_utc()));
    active.updated_at = Set(now.naive_utc());
    active.update(db).await?;

    tracing::info!(user_id, %expires_at, "issued qr token");
    Ok(IssuedQrToken { token, expires_at })
}

async fn find_by_token<C: ConnectionTrait>(
    db: &C,
    token: &str,
) -> Result<Option<user::Model>, AppError> {
    if token.is_empty() {
        return Ok(None);
    }
    Ok(User::find()
        .filter(user::Column::QrTokenHash.eq(hash_token(token)))
        .one(db)
        .await?)
}

/// Map a token to its owner's id by hash alone. Expiry is not checked;
/// see [`resolve_active_token`].
pub async fn resolve_token<C: ConnectionTrait>(
    db: &C,
    token: &str,
) -> Result<Option<i32>, AppError> {
    Ok(find_by_token(db, token).await?.map(|u| u.id))
}

/// A token without a recorded expiry counts as expired.
pub fn is_expired(expires_at: Option<NaiveDateTime>, now: DateTime<Utc>) -> bool {
    match expires_at {
        Some(expires_at) => expires_at <= now.naive_utc(),
        None => true,
    }
}

/// Resolve a token and enforce its expiry against `now`.
pub async fn resolve_active_token<C: ConnectionTrait>(
    db: &C,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Option<user::Model>, AppError> {
    Ok(find_by_token(db, token)
        .await?
        .filter(|user| !is_expired(user.qr_token_expires_at, now)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_boundary() {
        let now = Utc::now();
        assert!(!is_expired(Some((now + Duration::seconds(1)).naive_utc()), now));
        assert!(is_expired(Some(now.naive_utc()), now));
        assert!(is_expired(Some((now - Duration::hours(1)).naive_utc()), now));
        assert!(is_expired(None, now));
    }
}
