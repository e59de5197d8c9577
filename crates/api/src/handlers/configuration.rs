//! Handlers for the `/config` taxonomy: categories and their items.
//!
//! Reads are open to any authenticated role; writes are manager-gated.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cmms_core::error::CoreError;
use cmms_core::types::DbId;
use cmms_db::models::configuration::{
    ConfigCategory, ConfigItem, CreateConfigCategory, CreateConfigItem, UpdateConfigItem,
};
use cmms_db::repositories::ConfigRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/config/categories
pub async fn create_category(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Json(input): Json<CreateConfigCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<ConfigCategory>>)> {
    let category = ConfigRepo::create_category(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(category))))
}

/// GET /api/v1/config/categories
pub async fn list_categories(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<ConfigCategory>>>> {
    let categories = ConfigRepo::list_categories(&state.pool).await?;
    Ok(Json(DataResponse::new(categories)))
}

/// POST /api/v1/config/categories/{code}/items
pub async fn create_item(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(code): Path<String>,
    Json(input): Json<CreateConfigItem>,
) -> AppResult<(StatusCode, Json<DataResponse<ConfigItem>>)> {
    let category = ConfigRepo::find_category_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Unknown configuration category: {code}"
            )))
        })?;
    let item = ConfigRepo::create_item(&state.pool, category.id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(item))))
}

/// GET /api/v1/config/categories/{code}/items
pub async fn list_items(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(code): Path<String>,
) -> AppResult<Json<DataResponse<Vec<ConfigItem>>>> {
    let category = ConfigRepo::find_category_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Unknown configuration category: {code}"
            )))
        })?;
    let items = ConfigRepo::list_items(&state.pool, category.id).await?;
    Ok(Json(DataResponse::new(items)))
}

/// PUT /api/v1/config/items/{id}
pub async fn update_item(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateConfigItem>,
) -> AppResult<Json<DataResponse<ConfigItem>>> {
    let item = ConfigRepo::update_item(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ConfigItem",
            id,
        }))?;
    Ok(Json(DataResponse::new(item)))
}

/// DELETE /api/v1/config/items/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ConfigRepo::delete_item(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "ConfigItem",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
