//! Route definitions for `/analytics`.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/analytics`.
///
/// ```text
/// GET /overview -> overview
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/overview", get(dashboard::overview))
}
