pub mod admin_user;
pub mod auth_user;
pub mod json;

pub use admin_user::AdminUser;
pub use auth_user::{AuthUser, SESSION_COOKIE};
pub use json::Json;
