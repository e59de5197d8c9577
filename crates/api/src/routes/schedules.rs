//! Route definitions for the `/schedules` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::schedules;
use crate::state::AppState;

/// Routes mounted at `/schedules`.
///
/// ```text
/// GET    /               -> list_schedules
/// POST   /               -> create_schedule
/// GET    /due            -> list_due_schedules
/// GET    /{id}           -> get_schedule
/// PUT    /{id}           -> update_schedule
/// DELETE /{id}           -> delete_schedule
/// POST   /{id}/readings  -> record_reading
/// POST   /{id}/execute   -> execute_schedule (manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(schedules::list_schedules).post(schedules::create_schedule),
        )
        .route("/due", get(schedules::list_due_schedules))
        .route(
            "/{id}",
            get(schedules::get_schedule)
                .put(schedules::update_schedule)
                .delete(schedules::delete_schedule),
        )
        .route("/{id}/readings", post(schedules::record_reading))
        .route("/{id}/execute", post(schedules::execute_schedule))
}
