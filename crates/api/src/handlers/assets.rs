//! Handlers for the `/assets` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cmms_core::error::CoreError;
use cmms_core::types::DbId;
use cmms_db::models::asset::{Asset, CreateAsset, UpdateAsset};
use cmms_db::repositories::AssetRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/assets
pub async fn create_asset(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Json(input): Json<CreateAsset>,
) -> AppResult<(StatusCode, Json<DataResponse<Asset>>)> {
    let asset = AssetRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(asset))))
}

/// GET /api/v1/assets
pub async fn list_assets(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Asset>>>> {
    let assets = AssetRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(assets)))
}

/// GET /api/v1/assets/{id}
pub async fn get_asset(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Asset>>> {
    let asset = AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Asset", id }))?;
    Ok(Json(DataResponse::new(asset)))
}

/// GET /api/v1/assets/{id}/children
pub async fn list_asset_children(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Asset>>>> {
    AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Asset", id }))?;
    let children = AssetRepo::list_children(&state.pool, id).await?;
    Ok(Json(DataResponse::new(children)))
}

/// PUT /api/v1/assets/{id}
pub async fn update_asset(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAsset>,
) -> AppResult<Json<DataResponse<Asset>>> {
    let asset = AssetRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Asset", id }))?;
    Ok(Json(DataResponse::new(asset)))
}

/// DELETE /api/v1/assets/{id}
pub async fn delete_asset(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = AssetRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Asset", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}
