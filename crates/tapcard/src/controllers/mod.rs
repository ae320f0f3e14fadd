use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Config;

pub mod admin;
pub mod links;
pub mod nfc;
pub mod profiles;

/// Shared application state available in all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
}
