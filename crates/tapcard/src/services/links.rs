use std::collections::HashSet;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;
use crate::models::link::{self, Entity as Link};

fn default_icon() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewLink {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 2048, message = "must be 1-2048 characters"))]
    pub url: String,
    /// Icon tag such as "instagram"; unknown tags render with the default icon
    #[serde(default = "default_icon")]
    #[validate(length(min = 1, max = 32, message = "must be 1-32 characters"))]
    pub icon: String,
    /// Explicit rank; one past the highest existing rank when absent
    #[validate(range(min = 0, message = "must not be negative"))]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct LinkUpdate {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 2048, message = "must be 1-2048 characters"))]
    pub url: Option<String>,
    #[validate(length(min = 1, max = 32, message = "must be 1-32 characters"))]
    pub icon: Option<String>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub order: Option<i32>,
}

/// All links of a profile, ascending by rank (ties broken by id).
pub async fn get_links<C: ConnectionTrait>(
    db: &C,
    profile_id: i32,
) -> Result<Vec<link::Model>, AppError> {
    Ok(Link::find()
        .filter(link::Column::ProfileId.eq(profile_id))
        .order_by_asc(link::Column::SortOrder)
        .order_by_asc(link::Column::Id)
        .all(db)
        .await?)
}

/// Fetch a link only if it belongs to `profile_id`.
pub async fn find_owned_link<C: ConnectionTrait>(
    db: &C,
    profile_id: i32,
    link_id: i32,
) -> Result<link::Model, AppError> {
    Link::find_by_id(link_id)
        .filter(link::Column::ProfileId.eq(profile_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Link {} not found", link_id)))
}

/// Rank for a link appended to `profile_id`: one past the highest rank, or 0.
async fn next_order<C: ConnectionTrait>(db: &C, profile_id: i32) -> Result<i32, AppError> {
    let max: Option<Option<i32>> = Link::find()
        .select_only()
        .column_as(Expr::col(link::Column::SortOrder).max(), "max_order")
        .filter(link::Column::ProfileId.eq(profile_id))
        .into_tuple()
        .one(db)
        .await?;
    Ok(max.flatten().map_or(0, |order| order.saturating_add(1)))
}

pub async fn create_link<C: ConnectionTrait>(
    db: &C,
    profile_id: i32,
    new_link: NewLink,
) -> Result<link::Model, AppError> {
    new_link.validate()?;

    let order = match new_link.order {
        Some(order) => order,
        None => next_order(db, profile_id).await?,
    };

    let now = Utc::now().naive_utc();
    let model = link::ActiveModel {
        profile_id: Set(profile_id),
        title: Set(new_link.title.trim().to_string()),
        url: Set(new_link.url.trim().to_string()),
        icon: Set(new_link.icon.trim().to_string()),
        sort_order: Set(order),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let link = model.insert(db).await?;
    tracing::debug!(profile_id, link_id = link.id, order, "link created");
    Ok(link)
}

pub async fn update_link<C: ConnectionTrait>(
    db: &C,
    profile_id: i32,
    link_id: i32,
    changes: LinkUpdate,
) -> Result<link::Model, AppError> {
    changes.validate()?;

    let existing = find_owned_link(db, profile_id, link_id).await?;
    let mut active: link::ActiveModel = existing.into();
    if let Some(title) = changes.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(url) = changes.url {
        active.url = Set(url.trim().to_string());
    }
    if let Some(icon) = changes.icon {
        active.icon = Set(icon.trim().to_string());
    }
    if let Some(order) = changes.order {
        active.sort_order = Set(order);
    }
    active.updated_at = Set(Utc::now().naive_utc());
    Ok(active.update(db).await?)
}

/// Delete a link. Remaining links keep their ranks.
pub async fn delete_link<C: ConnectionTrait>(
    db: &C,
    profile_id: i32,
    link_id: i32,
) -> Result<(), AppError> {
    find_owned_link(db, profile_id, link_id).await?;
    Link::delete_many()
        .filter(link::Column::Id.eq(link_id))
        .filter(link::Column::ProfileId.eq(profile_id))
        .exec(db)
        .await?;
    tracing::debug!(profile_id, link_id, "link deleted");
    Ok(())
}

/// Compute the new rank of every link.
///
/// `current` is the profile's link ids in their present order, `requested`
/// the caller's ordering. Requested ids come first, in the given sequence;
/// omitted links follow in their previous relative order. The result is a
/// dense `0..N-1` ranking over all of `current`.
pub fn plan_order(current: &[i32], requested: &[i32]) -> Result<Vec<(i32, i32)>, AppError> {
    let mut seen = HashSet::with_capacity(requested.len());
    for id in requested {
        if !seen.insert(*id) {
            return Err(AppError::Validation(format!(
                "Link {} appears more than once",
                id
            )));
        }
    }

    let owned: HashSet<i32> = current.iter().copied().collect();
    if let Some(foreign) = requested.iter().find(|id| !owned.contains(id)) {
        return Err(AppError::NotFound(format!("Link {} not found", foreign)));
    }

    let omitted = current.iter().filter(|id| !seen.contains(id));
    Ok(requested
        .iter()
        .chain(omitted)
        .enumerate()
        .map(|(rank, id)| (*id, rank as i32))
        .collect())
}

/// Reorder a profile's links in one transaction.
///
/// Ids that do not belong to the profile abort the whole operation; nothing
/// is written unless every row can be renumbered.
pub async fn reorder_links(
    db: &DatabaseConnection,
    profile_id: i32,
    link_ids: &[i32],
) -> Result<Vec<link::Model>, AppError> {
    let txn = db.begin().await?;

    let existing = get_links(&txn, profile_id).await?;
    let current: Vec<i32> = existing.iter().map(|l| l.id).collect();
    let plan = plan_order(&current, link_ids)?;

    let now = Utc::now().naive_utc();
    for (link_id, rank) in &plan {
        let unchanged = existing
            .iter()
            .any(|l| l.id == *link_id && l.sort_order == *rank);
        if unchanged {
            continue;
        }
        Link::update_many()
            .col_expr(link::Column::SortOrder, Expr::value(*rank))
            .col_expr(link::Column::UpdatedAt, Expr::value(now))
            .filter(link::Column::Id.eq(*link_id))
            .filter(link::Column::ProfileId.eq(profile_id))
            .exec(&txn)
            .await?;
    }

    let links = get_links(&txn, profile_id).await?;
    txn.commit().await?;

    tracing::info!(profile_id, count = plan.len(), "links reordered");
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_reorder_is_dense() {
        let plan = plan_order(&[1, 2, 3], &[3, 1, 2]).unwrap();
        assert_eq!(plan, vec![(3, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn omitted_links_follow_in_previous_order() {
        let plan = plan_order(&[10, 20, 30, 40], &[30]).unwrap();
        assert_eq!(plan, vec![(30, 0), (10, 1), (20, 2), (40, 3)]);
    }

    #[test]
    fn empty_request_renumbers_current_order() {
        let plan = plan_order(&[5, 7], &[]).unwrap();
        assert_eq!(plan, vec![(5, 0), (7, 1)]);
    }

    #[test]
    fn foreign_id_is_rejected() {
        let err = plan_order(&[1, 2], &[2, 99]).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let err = plan_order(&[1, 2], &[1, 1]).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
