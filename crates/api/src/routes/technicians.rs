//! Route definitions for the `/technicians` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::technicians;
use crate::state::AppState;

/// Routes mounted at `/technicians`.
///
/// ```text
/// GET    /       -> list_technicians (?skill=)
/// POST   /       -> create_technician
/// GET    /{id}   -> get_technician
/// PUT    /{id}   -> update_technician
/// DELETE /{id}   -> deactivate_technician (soft delete)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(technicians::list_technicians).post(technicians::create_technician),
        )
        .route(
            "/{id}",
            get(technicians::get_technician)
                .put(technicians::update_technician)
                .delete(technicians::deactivate_technician),
        )
}
