//! Handler for the `/analytics` overview.

use axum::extract::State;
use axum::Json;
use cmms_db::models::dashboard::AnalyticsOverview;
use cmms_db::repositories::DashboardRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/analytics/overview
pub async fn overview(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<AnalyticsOverview>>> {
    let overview = DashboardRepo::overview(&state.pool).await?;
    Ok(Json(DataResponse::new(overview)))
}
