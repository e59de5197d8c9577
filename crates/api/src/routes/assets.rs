//! Route definitions for the `/assets` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Routes mounted at `/assets`.
///
/// ```text
/// GET    /               -> list_assets
/// POST   /               -> create_asset
/// GET    /{id}           -> get_asset
/// PUT    /{id}           -> update_asset
/// DELETE /{id}           -> delete_asset
/// GET    /{id}/children  -> list_asset_children
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::list_assets).post(assets::create_asset))
        .route(
            "/{id}",
            get(assets::get_asset)
                .put(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route("/{id}/children", get(assets::list_asset_children))
}
