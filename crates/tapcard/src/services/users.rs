use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::auth::Claims;
use crate::error::AppError;
use crate::models::user::{self, Entity as User};

/// Who the identity provider says the caller is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub username: String,
    pub email: Option<String>,
}

impl From<&Claims> for Identity {
    fn from(claims: &Claims) -> Self {
        Identity {
            subject: claims.sub.clone(),
            username: claims.username().to_string(),
            email: claims.email.clone(),
        }
    }
}

/// Explicit user creation, for fixtures and tests.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub subject: String,
    pub username: String,
    pub email: Option<String>,
    pub is_admin: bool,
}

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Option<user::Model>, AppError> {
    Ok(User::find_by_id(user_id).one(db).await?)
}

pub async fn find_by_subject<C: ConnectionTrait>(
    db: &C,
    subject: &str,
) -> Result<Option<user::Model>, AppError> {
    Ok(User::find()
        .filter(user::Column::Subject.eq(subject))
        .one(db)
        .await?)
}

pub async fn create_user<C: ConnectionTrait>(
    db: &C,
    new_user: NewUser,
) -> Result<user::Model, AppError> {
    let now = Utc::now().naive_utc();
    let model = user::ActiveModel {
        subject: Set(new_user.subject),
        username: Set(new_user.username),
        email: Set(new_user.email),
        is_admin: Set(new_user.is_admin),
        is_activated: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Insert-or-refresh the user behind an identity, keyed by subject.
///
/// `promote` marks the user as admin; an existing admin flag is never cleared.
pub async fn upsert_user<C: ConnectionTrait>(
    db: &C,
    identity: &Identity,
    promote: bool,
) -> Result<user::Model, AppError> {
    if let Some(existing) = find_by_subject(db, &identity.subject).await? {
        let unchanged = existing.username == identity.username
            && existing.email == identity.email
            && (existing.is_admin || !promote);
        if unchanged {
            return Ok(existing);
        }
    }

    let now = Utc::now().naive_utc();
    let model = user::ActiveModel {
        subject: Set(identity.subject.clone()),
        username: Set(identity.username.clone()),
        email: Set(identity.email.clone()),
        is_admin: Set(promote),
        is_activated: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    User::insert(model)
        .on_conflict(
            OnConflict::column(user::Column::Subject)
                .update_columns([
                    user::Column::Username,
                    user::Column::Email,
                    user::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    let user = find_by_subject(db, &identity.subject)
        .await?
        .ok_or_else(|| AppError::Internal("User vanished after upsert".to_string()))?;

    if promote && !user.is_admin {
        tracing::info!(user_id = user.id, "promoting user to admin");
        let mut active: user::ActiveModel = user.into();
        active.is_admin = Set(true);
        active.updated_at = Set(now);
        return Ok(active.update(db).await?);
    }

    Ok(user)
}

/// Mark a user's card as activated by an admin.
pub async fn activate_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    activated_by: &str,
) -> Result<user::Model, AppError> {
    let user = find_by_id(db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    let now = Utc::now().naive_utc();
    let mut active: user::ActiveModel = user.into();
    active.is_activated = Set(true);
    active.activation_date = Set(Some(now));
    active.activated_by = Set(Some(activated_by.to_string()));
    active.updated_at = Set(now);
    let user = active.update(db).await?;

    tracing::info!(user_id, activated_by, "user activated");
    Ok(user)
}

pub async fn list_users<C: ConnectionTrait>(db: &C) -> Result<Vec<user::Model>, AppError> {
    Ok(User::find()
        .order_by_asc(user::Column::CreatedAt)
        .order_by_asc(user::Column::Id)
        .all(db)
        .await?)
}
