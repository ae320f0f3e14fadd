use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, FieldError};
use crate::models::link::LinkResponse;
use crate::models::profile::{
    self, DEFAULT_BACKGROUND_COLOR, DEFAULT_BIO, DEFAULT_THEME_COLOR, Entity as Profile,
    ProfileWithLinks, PublicProfile,
};
use crate::models::user;
use crate::services::{links, users};

/// Partial profile update. Absent fields are left alone; an empty string
/// clears an optional field (bio, phone, avatar).
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub display_name: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub bio: Option<String>,
    #[validate(length(max = 32, message = "must be at most 32 characters"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub slug: Option<String>,
    #[validate(length(max = 2048, message = "must be at most 2048 characters"))]
    pub avatar_url: Option<String>,
    pub theme_color: Option<String>,
    pub background_color: Option<String>,
}

impl ProfileUpdate {
    /// Length rules plus slug and color format checks.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;

        let mut errors = Vec::new();
        if let Some(slug) = &self.slug {
            if !is_valid_slug(slug) {
                errors.push(FieldError::with_code(
                    "slug",
                    "may only contain lowercase letters, digits and '-'",
                    "slug",
                ));
            }
        }
        for (field, value) in [
            ("theme_color", &self.theme_color),
            ("background_color", &self.background_color),
        ] {
            if let Some(color) = value {
                if !is_hex_color(color) {
                    errors.push(FieldError::with_code(
                        field,
                        "must be a hex color like #1a2b3c",
                        "color",
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation_fields(errors))
        }
    }
}

/// Turn a username into a slug: lowercase ASCII alphanumerics separated by
/// single dashes. May return an empty string.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug.truncate(48);
    slug.trim_end_matches('-').to_string()
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

fn blank_to_none(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    profile_id: i32,
) -> Result<Option<profile::Model>, AppError> {
    Ok(Profile::find_by_id(profile_id).one(db).await?)
}

pub async fn get_profile_by_user_id<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Option<profile::Model>, AppError> {
    Ok(Profile::find()
        .filter(profile::Column::UserId.eq(user_id))
        .one(db)
        .await?)
}

/// Like [`get_profile_by_user_id`] but a missing profile is a 404.
pub async fn require_profile_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<profile::Model, AppError> {
    get_profile_by_user_id(db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

async fn slug_taken<C: ConnectionTrait>(
    db: &C,
    slug: &str,
    except_profile: Option<i32>,
) -> Result<bool, AppError> {
    let mut query = Profile::find().filter(profile::Column::Slug.eq(slug));
    if let Some(id) = except_profile {
        query = query.filter(profile::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

/// Public view of a profile: ordered links plus the owner's activation state.
pub async fn public_view<C: ConnectionTrait>(
    db: &C,
    profile: profile::Model,
) -> Result<PublicProfile, AppError> {
    let owner = users::find_by_id(db, profile.user_id).await?;
    let links = links::get_links(db, profile.id).await?;
    Ok(PublicProfile {
        is_activated: owner.map(|u| u.is_activated).unwrap_or(false),
        profile: profile.into(),
        links: links.into_iter().map(LinkResponse::from).collect(),
    })
}

/// Look up a profile by its public slug.
pub async fn get_profile_by_slug<C: ConnectionTrait>(
    db: &C,
    slug: &str,
) -> Result<PublicProfile, AppError> {
    let profile = Profile::find()
        .filter(profile::Column::Slug.eq(slug))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    public_view(db, profile).await
}

async fn with_links<C: ConnectionTrait>(
    db: &C,
    profile: profile::Model,
) -> Result<ProfileWithLinks, AppError> {
    let links = links::get_links(db, profile.id).await?;
    Ok(ProfileWithLinks {
        profile: profile.into(),
        links: links.into_iter().map(LinkResponse::from).collect(),
    })
}

/// Upper bound on default-slug candidates tried for one user.
const MAX_SLUG_ATTEMPTS: u32 = 32;

/// Default slugs to try for a new profile, in order.
///
/// `slugify(username)`, then `{slug}-{id}`, then `{slug}-{id}-2`, `-3`, ...
/// A username with no usable characters starts at `user-{id}` instead.
pub fn default_slug_candidates(username: &str, user_id: i32) -> impl Iterator<Item = String> {
    let named = slugify(username);
    let (leading, suffixed) = if named.is_empty() {
        let base = format!("user-{}", user_id);
        (vec![base.clone()], base)
    } else {
        let suffixed = format!("{}-{}", named, user_id);
        (vec![named, suffixed.clone()], suffixed)
    };

    leading
        .into_iter()
        .chain((2..).map(move |n| format!("{}-{}", suffixed, n)))
        .take(MAX_SLUG_ATTEMPTS as usize)
}

/// Return the user's profile, creating the default one on first call.
///
/// The insert is `ON CONFLICT (user_id) DO NOTHING`, so racing first calls
/// converge on one row. A slug lost to another profile between the check and
/// the insert moves on to the next candidate.
pub async fn get_or_create_profile_for_user<C: ConnectionTrait>(
    db: &C,
    user: &user::Model,
) -> Result<ProfileWithLinks, AppError> {
    if let Some(existing) = get_profile_by_user_id(db, user.id).await? {
        return with_links(db, existing).await;
    }

    for slug in default_slug_candidates(&user.username, user.id) {
        if slug_taken(db, &slug, None).await? {
            continue;
        }

        let now = Utc::now().naive_utc();
        let model = profile::ActiveModel {
            user_id: Set(user.id),
            display_name: Set(user.username.clone()),
            bio: Set(Some(DEFAULT_BIO.to_string())),
            phone: Set(None),
            slug: Set(slug.clone()),
            avatar_url: Set(None),
            theme_color: Set(DEFAULT_THEME_COLOR.to_string()),
            background_color: Set(DEFAULT_BACKGROUND_COLOR.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let inserted = Profile::insert(model)
            .on_conflict(
                OnConflict::column(profile::Column::UserId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match inserted {
            Ok(rows) => {
                if rows > 0 {
                    tracing::info!(user_id = user.id, %slug, "created default profile");
                }
                let profile = require_profile_for_user(db, user.id).await?;
                return with_links(db, profile).await;
            }
            Err(err) => match AppError::conflict_on_unique(err, "Profile slug is already taken") {
                AppError::Conflict(_) => {
                    if let Some(existing) = get_profile_by_user_id(db, user.id).await? {
                        return with_links(db, existing).await;
                    }
                    tracing::debug!(user_id = user.id, %slug, "default slug taken, trying next");
                }
                other => return Err(other),
            },
        }
    }

    Err(AppError::Conflict(format!(
        "Could not allocate a profile slug for user {}",
        user.id
    )))
}

/// Apply a partial update to a profile.
pub async fn update_profile<C: ConnectionTrait>(
    db: &C,
    profile_id: i32,
    changes: ProfileUpdate,
) -> Result<profile::Model, AppError> {
    changes.check()?;

    let existing = find_by_id(db, profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    if let Some(slug) = &changes.slug {
        if slug != &existing.slug && slug_taken(db, slug, Some(profile_id)).await? {
            return Err(AppError::Conflict(format!("Slug '{}' is already taken", slug)));
        }
    }

    let mut active: profile::ActiveModel = existing.into();
    if let Some(display_name) = changes.display_name {
        active.display_name = Set(display_name.trim().to_string());
    }
    if let Some(bio) = changes.bio {
        active.bio = Set(blank_to_none(bio));
    }
    if let Some(phone) = changes.phone {
        active.phone = Set(blank_to_none(phone));
    }
    if let Some(slug) = changes.slug {
        active.slug = Set(slug);
    }
    if let Some(avatar_url) = changes.avatar_url {
        active.avatar_url = Set(blank_to_none(avatar_url));
    }
    if let Some(theme_color) = changes.theme_color {
        active.theme_color = Set(theme_color.to_lowercase());
    }
    if let Some(background_color) = changes.background_color {
        active.background_color = Set(background_color.to_lowercase());
    }
    active.updated_at = Set(Utc::now().naive_utc());

    active
        .update(db)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Slug is already taken"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Jane Doe"), "jane-doe");
        assert_eq!(slugify("  jane__doe!! "), "jane-doe");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify("Ünïcode"), "n-code");
    }

    #[test]
    fn slug_candidates_keep_suffixing() {
        let names: Vec<_> = default_slug_candidates("Jane", 7).take(4).collect();
        assert_eq!(names, vec!["jane", "jane-7", "jane-7-2", "jane-7-3"]);
    }

    #[test]
    fn slug_candidates_for_unsluggable_names() {
        let names: Vec<_> = default_slug_candidates("!!!", 7).take(3).collect();
        assert_eq!(names, vec!["user-7", "user-7-2", "user-7-3"]);
    }

    #[test]
    fn slug_candidates_are_valid_and_bounded() {
        let long = "x".repeat(200);
        let names: Vec<_> = default_slug_candidates(&long, i32::MAX).collect();
        assert_eq!(names.len(), MAX_SLUG_ATTEMPTS as usize);
        assert!(names.iter().all(|s| is_valid_slug(s) && s.len() <= 64));
    }

    #[test]
    fn slug_rules() {
        assert!(is_valid_slug("jane-doe-42"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Jane"));
        assert!(!is_valid_slug("-jane"));
        assert!(!is_valid_slug("jane doe"));
    }

    #[test]
    fn color_rules() {
        assert!(is_hex_color("#000"));
        assert!(is_hex_color("#1A2b3C"));
        assert!(!is_hex_color("000000"));
        assert!(!is_hex_color("#12345"));
        assert!(!is_hex_color("#gggggg"));
    }

    #[test]
    fn update_check_reports_fields() {
        let update = ProfileUpdate {
            slug: Some("Bad Slug".to_string()),
            theme_color: Some("red".to_string()),
            ..Default::default()
        };
        match update.check() {
            Err(AppError::ValidationErrors(fields)) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["slug", "theme_color"]);
            }
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    #[test]
    fn update_check_enforces_lengths() {
        let update = ProfileUpdate {
            display_name: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            update.check(),
            Err(AppError::ValidationErrors(_))
        ));
    }
}
