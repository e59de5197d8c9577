//! Root-level liveness endpoint, mounted outside `/api/v1`.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    db_healthy: bool,
}

/// GET /health
///
/// Reports `ok` when the database answers a ping, `degraded` otherwise. Always
/// 200 so load balancers can read the body instead of interpreting the code.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = cmms_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
