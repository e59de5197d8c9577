//! Handlers for the `/parts` resource and its stock-movement ledger.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cmms_core::error::CoreError;
use cmms_core::types::DbId;
use cmms_db::models::part::{CreatePart, Part, UpdatePart};
use cmms_db::models::stock_movement::{CreateStockMovement, MovementWithStock, StockMovement};
use cmms_db::repositories::{PartRepo, StockMovementRepo};
use cmms_db::tx::with_retry;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/parts
pub async fn create_part(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Json(input): Json<CreatePart>,
) -> AppResult<(StatusCode, Json<DataResponse<Part>>)> {
    let part = PartRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(part))))
}

/// GET /api/v1/parts
pub async fn list_parts(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Part>>>> {
    let parts = PartRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(parts)))
}

/// GET /api/v1/parts/low-stock
pub async fn list_low_stock(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Part>>>> {
    let parts = PartRepo::list_low_stock(&state.pool).await?;
    Ok(Json(DataResponse::new(parts)))
}

/// GET /api/v1/parts/{id}
pub async fn get_part(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Part>>> {
    let part = PartRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Part", id }))?;
    Ok(Json(DataResponse::new(part)))
}

/// PUT /api/v1/parts/{id}
pub async fn update_part(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePart>,
) -> AppResult<Json<DataResponse<Part>>> {
    let part = PartRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Part", id }))?;
    Ok(Json(DataResponse::new(part)))
}

/// DELETE /api/v1/parts/{id}
pub async fn delete_part(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = PartRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Part", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/parts/{id}/movements
///
/// Apply a manual stock adjustment. Retried on serialization conflicts so
/// concurrent adjustments against the same part resolve cleanly.
pub async fn apply_movement(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<CreateStockMovement>,
) -> AppResult<(StatusCode, Json<DataResponse<StockMovement>>)> {
    let movement = with_retry(|| {
        StockMovementRepo::apply(&state.pool, id, Some(user.user_id), &input)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(movement))))
}

/// GET /api/v1/parts/{id}/movements
///
/// The part's full movement history, oldest first, with the stock level
/// after each movement.
pub async fn list_movements(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<MovementWithStock>>>> {
    let movements = StockMovementRepo::list_with_stock(&state.pool, id).await?;
    Ok(Json(DataResponse::new(movements)))
}
