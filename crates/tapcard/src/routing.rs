use axum::Router;

use crate::controllers::{AppState, admin, links, nfc, profiles};

/// All API routes. Docs and health are mounted by [`crate::App::router`].
pub fn build_routes() -> Router<AppState> {
    Router::new()
        .merge(profiles::routes())
        .merge(links::routes())
        .merge(nfc::routes())
        .merge(admin::routes())
}
