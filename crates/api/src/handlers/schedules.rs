//! Handlers for the `/schedules` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cmms_core::error::CoreError;
use cmms_core::schedule;
use cmms_core::types::DbId;
use cmms_db::models::maintenance_schedule::{
    CreateMaintenanceSchedule, MaintenanceSchedule, ReadingResult, RecordReading,
    UpdateMaintenanceSchedule,
};
use cmms_db::models::work_order::WorkOrder;
use cmms_db::repositories::MaintenanceScheduleRepo;
use cmms_db::tx::with_retry;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/schedules
pub async fn create_schedule(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Json(input): Json<CreateMaintenanceSchedule>,
) -> AppResult<(StatusCode, Json<DataResponse<MaintenanceSchedule>>)> {
    let schedule = MaintenanceScheduleRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(schedule))))
}

/// GET /api/v1/schedules
pub async fn list_schedules(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<MaintenanceSchedule>>>> {
    let schedules = MaintenanceScheduleRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(schedules)))
}

/// GET /api/v1/schedules/due
pub async fn list_due_schedules(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<MaintenanceSchedule>>>> {
    let schedules = MaintenanceScheduleRepo::list_due(&state.pool).await?;
    Ok(Json(DataResponse::new(schedules)))
}

/// GET /api/v1/schedules/{id}
pub async fn get_schedule(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MaintenanceSchedule>>> {
    let schedule = MaintenanceScheduleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MaintenanceSchedule",
            id,
        }))?;
    Ok(Json(DataResponse::new(schedule)))
}

/// PUT /api/v1/schedules/{id}
pub async fn update_schedule(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMaintenanceSchedule>,
) -> AppResult<Json<DataResponse<MaintenanceSchedule>>> {
    let schedule = MaintenanceScheduleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MaintenanceSchedule",
            id,
        }))?;
    Ok(Json(DataResponse::new(schedule)))
}

/// DELETE /api/v1/schedules/{id}
pub async fn delete_schedule(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = MaintenanceScheduleRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "MaintenanceSchedule",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/schedules/{id}/readings
///
/// Record a metric reading on a threshold-based schedule; the response flags
/// whether the threshold is now reached.
pub async fn record_reading(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<RecordReading>,
) -> AppResult<Json<DataResponse<ReadingResult>>> {
    let updated = MaintenanceScheduleRepo::record_reading(&state.pool, id, input.value).await?;
    let threshold_reached = updated
        .threshold_value
        .is_some_and(|threshold| schedule::threshold_reached(updated.current_value, threshold));
    Ok(Json(DataResponse::new(ReadingResult {
        schedule: updated,
        threshold_reached,
    })))
}

/// POST /api/v1/schedules/{id}/execute
///
/// Spawn the schedule's work order and advance its trigger. Manager-gated:
/// executing a schedule creates maintenance work.
pub async fn execute_schedule(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<WorkOrder>>)> {
    let order = with_retry(|| MaintenanceScheduleRepo::execute(&state.pool, id)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(order))))
}
