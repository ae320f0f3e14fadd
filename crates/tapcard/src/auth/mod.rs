pub mod jwt;
pub mod token;

pub use jwt::{Claims, create_token, validate_token};
pub use token::{generate_secure_token, hash_token};

use crate::error::AppError;
use crate::models::user;

/// The single authorization predicate for admin-only operations.
pub fn require_admin(user: &user::Model) -> Result<(), AppError> {
    if user.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin access required".to_string()))
    }
}
