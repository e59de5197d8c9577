//! Route definitions for the `/part-requests` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::part_requests;
use crate::state::AppState;

/// Routes mounted at `/part-requests`.
///
/// ```text
/// GET    /               -> list_part_requests (?status=)
/// POST   /               -> create_part_request
/// GET    /mine           -> list_my_part_requests
/// GET    /{id}           -> get_part_request
/// POST   /{id}/approve   -> approve_part_request (manager)
/// POST   /{id}/reject    -> reject_part_request (manager)
/// POST   /{id}/deliver   -> deliver_part_request (manager)
/// POST   /{id}/cancel    -> cancel_part_request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(part_requests::list_part_requests).post(part_requests::create_part_request),
        )
        .route("/mine", get(part_requests::list_my_part_requests))
        .route("/{id}", get(part_requests::get_part_request))
        .route("/{id}/approve", post(part_requests::approve_part_request))
        .route("/{id}/reject", post(part_requests::reject_part_request))
        .route("/{id}/deliver", post(part_requests::deliver_part_request))
        .route("/{id}/cancel", post(part_requests::cancel_part_request))
}
