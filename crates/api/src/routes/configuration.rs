//! Route definitions for the `/config` taxonomy.

use axum::routing::get;
use axum::Router;

use crate::handlers::configuration;
use crate::state::AppState;

/// Routes mounted at `/config`.
///
/// ```text
/// GET    /categories               -> list_categories
/// POST   /categories               -> create_category (manager)
/// GET    /categories/{code}/items  -> list_items
/// POST   /categories/{code}/items  -> create_item (manager)
/// PUT    /items/{id}               -> update_item (manager)
/// DELETE /items/{id}               -> delete_item (manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            get(configuration::list_categories).post(configuration::create_category),
        )
        .route(
            "/categories/{code}/items",
            get(configuration::list_items).post(configuration::create_item),
        )
        .route(
            "/items/{id}",
            axum::routing::put(configuration::update_item).delete(configuration::delete_item),
        )
}
