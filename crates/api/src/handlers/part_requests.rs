//! Handlers for the `/part-requests` resource.
//!
//! Approval reserves stock, delivery consumes it; both run under the retry
//! helper since they contend with work-order flows on the same part rows.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cmms_core::error::CoreError;
use cmms_core::types::DbId;
use cmms_db::models::part_request::{CreatePartRequest, PartRequest, RejectPartRequest};
use cmms_db::repositories::PartRequestRepo;
use cmms_db::tx::with_retry;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

/// Optional status filter for `GET /part-requests`.
#[derive(Debug, Default, Deserialize)]
pub struct PartRequestListQuery {
    pub status: Option<String>,
}

/// POST /api/v1/part-requests
pub async fn create_part_request(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<CreatePartRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<PartRequest>>)> {
    let request = PartRequestRepo::create(&state.pool, Some(user.user_id), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(request))))
}

/// GET /api/v1/part-requests
pub async fn list_part_requests(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(query): Query<PartRequestListQuery>,
) -> AppResult<Json<DataResponse<Vec<PartRequest>>>> {
    let requests = PartRequestRepo::list(&state.pool, query.status.as_deref()).await?;
    Ok(Json(DataResponse::new(requests)))
}

/// GET /api/v1/part-requests/mine
pub async fn list_my_part_requests(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<PartRequest>>>> {
    let requests = PartRequestRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse::new(requests)))
}

/// GET /api/v1/part-requests/{id}
pub async fn get_part_request(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PartRequest>>> {
    let request = PartRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PartRequest",
            id,
        }))?;
    Ok(Json(DataResponse::new(request)))
}

/// POST /api/v1/part-requests/{id}/approve
pub async fn approve_part_request(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PartRequest>>> {
    let request = with_retry(|| PartRequestRepo::approve(&state.pool, id, user.user_id)).await?;
    Ok(Json(DataResponse::new(request)))
}

/// POST /api/v1/part-requests/{id}/reject
pub async fn reject_part_request(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<RejectPartRequest>,
) -> AppResult<Json<DataResponse<PartRequest>>> {
    let request =
        PartRequestRepo::reject(&state.pool, id, user.user_id, &input.reason).await?;
    Ok(Json(DataResponse::new(request)))
}

/// POST /api/v1/part-requests/{id}/deliver
pub async fn deliver_part_request(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PartRequest>>> {
    let request =
        with_retry(|| PartRequestRepo::deliver(&state.pool, id, Some(user.user_id))).await?;
    Ok(Json(DataResponse::new(request)))
}

/// POST /api/v1/part-requests/{id}/cancel
pub async fn cancel_part_request(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PartRequest>>> {
    let request = with_retry(|| PartRequestRepo::cancel(&state.pool, id)).await?;
    Ok(Json(DataResponse::new(request)))
}
