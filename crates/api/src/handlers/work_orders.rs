//! Handlers for the `/work-orders` resource.
//!
//! Creation and the lifecycle transitions delegate to transactional flows in
//! `cmms-db`; stock-touching flows run under the retry helper.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cmms_core::error::CoreError;
use cmms_core::types::DbId;
use cmms_db::models::work_order::{
    CancelWorkOrder, CompleteWorkOrder, CreateWorkOrder, UpdateWorkOrder, WorkOrder,
    WorkOrderListQuery, WorkOrderPart,
};
use cmms_db::repositories::WorkOrderRepo;
use cmms_db::tx::with_retry;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/work-orders
pub async fn create_work_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<CreateWorkOrder>,
) -> AppResult<(StatusCode, Json<DataResponse<WorkOrder>>)> {
    let order = with_retry(|| {
        WorkOrderRepo::create_with_parts(&state.pool, Some(user.user_id), &input)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(order))))
}

/// GET /api/v1/work-orders
pub async fn list_work_orders(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(filter): Query<WorkOrderListQuery>,
) -> AppResult<Json<DataResponse<Vec<WorkOrder>>>> {
    let orders = WorkOrderRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse::new(orders)))
}

/// GET /api/v1/work-orders/{id}
pub async fn get_work_order(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkOrder>>> {
    let order = WorkOrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkOrder",
            id,
        }))?;
    Ok(Json(DataResponse::new(order)))
}

/// GET /api/v1/work-orders/{id}/parts
pub async fn list_work_order_parts(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<WorkOrderPart>>>> {
    WorkOrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkOrder",
            id,
        }))?;
    let parts = WorkOrderRepo::list_parts(&state.pool, id).await?;
    Ok(Json(DataResponse::new(parts)))
}

/// PUT /api/v1/work-orders/{id}
pub async fn update_work_order(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkOrder>,
) -> AppResult<Json<DataResponse<WorkOrder>>> {
    let order = WorkOrderRepo::update(&state.pool, id, &input).await?;
    Ok(Json(DataResponse::new(order)))
}

/// POST /api/v1/work-orders/{id}/start
pub async fn start_work_order(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkOrder>>> {
    let order = WorkOrderRepo::start(&state.pool, id).await?;
    Ok(Json(DataResponse::new(order)))
}

/// POST /api/v1/work-orders/{id}/complete
pub async fn complete_work_order(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<CompleteWorkOrder>,
) -> AppResult<Json<DataResponse<WorkOrder>>> {
    let order = WorkOrderRepo::complete(&state.pool, id, &input).await?;
    Ok(Json(DataResponse::new(order)))
}

/// POST /api/v1/work-orders/{id}/cancel
///
/// Returns reserved line stock via compensating `in` movements, so the call
/// runs under retry like creation.
pub async fn cancel_work_order(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<CancelWorkOrder>,
) -> AppResult<Json<DataResponse<WorkOrder>>> {
    let order = with_retry(|| WorkOrderRepo::cancel(&state.pool, id, &input)).await?;
    Ok(Json(DataResponse::new(order)))
}

/// POST /api/v1/work-orders/{id}/approve
pub async fn approve_work_order(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkOrder>>> {
    let order = WorkOrderRepo::approve(&state.pool, id, user.user_id).await?;
    Ok(Json(DataResponse::new(order)))
}

/// Request body for `POST /work-orders/{id}/reject`.
#[derive(Debug, serde::Deserialize)]
pub struct RejectWorkOrder {
    pub reason: String,
}

/// POST /api/v1/work-orders/{id}/reject
pub async fn reject_work_order(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<RejectWorkOrder>,
) -> AppResult<Json<DataResponse<WorkOrder>>> {
    let order = with_retry(|| WorkOrderRepo::reject(&state.pool, id, &input.reason)).await?;
    Ok(Json(DataResponse::new(order)))
}
