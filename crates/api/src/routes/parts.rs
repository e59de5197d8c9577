//! Route definitions for the `/parts` resource and its movement ledger.

use axum::routing::get;
use axum::Router;

use crate::handlers::parts;
use crate::state::AppState;

/// Routes mounted at `/parts`.
///
/// ```text
/// GET    /                -> list_parts
/// POST   /                -> create_part
/// GET    /low-stock       -> list_low_stock
/// GET    /{id}            -> get_part
/// PUT    /{id}            -> update_part
/// DELETE /{id}            -> delete_part
/// GET    /{id}/movements  -> list_movements
/// POST   /{id}/movements  -> apply_movement
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(parts::list_parts).post(parts::create_part))
        .route("/low-stock", get(parts::list_low_stock))
        .route(
            "/{id}",
            get(parts::get_part)
                .put(parts::update_part)
                .delete(parts::delete_part),
        )
        .route(
            "/{id}/movements",
            get(parts::list_movements).post(parts::apply_movement),
        )
}
