//! Route definitions for the `/work-orders` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::work_orders;
use crate::state::AppState;

/// Routes mounted at `/work-orders`.
///
/// ```text
/// GET    /               -> list_work_orders (?status=&asset_id=&assigned_to=)
/// POST   /               -> create_work_order
/// GET    /{id}           -> get_work_order
/// PUT    /{id}           -> update_work_order
/// GET    /{id}/parts     -> list_work_order_parts
/// POST   /{id}/start     -> start_work_order
/// POST   /{id}/complete  -> complete_work_order
/// POST   /{id}/cancel    -> cancel_work_order
/// POST   /{id}/approve   -> approve_work_order (manager)
/// POST   /{id}/reject    -> reject_work_order (manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(work_orders::list_work_orders).post(work_orders::create_work_order),
        )
        .route(
            "/{id}",
            get(work_orders::get_work_order).put(work_orders::update_work_order),
        )
        .route("/{id}/parts", get(work_orders::list_work_order_parts))
        .route("/{id}/start", post(work_orders::start_work_order))
        .route("/{id}/complete", post(work_orders::complete_work_order))
        .route("/{id}/cancel", post(work_orders::cancel_work_order))
        .route("/{id}/approve", post(work_orders::approve_work_order))
        .route("/{id}/reject", post(work_orders::reject_work_order))
}
