//! Handlers for the `/technicians` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cmms_core::error::CoreError;
use cmms_core::types::DbId;
use cmms_db::models::technician::{CreateTechnician, Technician, UpdateTechnician};
use cmms_db::repositories::TechnicianRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

/// Optional skill filter for `GET /technicians`.
#[derive(Debug, Default, Deserialize)]
pub struct TechnicianListQuery {
    pub skill: Option<String>,
}

/// POST /api/v1/technicians
pub async fn create_technician(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Json(input): Json<CreateTechnician>,
) -> AppResult<(StatusCode, Json<DataResponse<Technician>>)> {
    let technician = TechnicianRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(technician))))
}

/// GET /api/v1/technicians
pub async fn list_technicians(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(query): Query<TechnicianListQuery>,
) -> AppResult<Json<DataResponse<Vec<Technician>>>> {
    let technicians = match query.skill.as_deref() {
        Some(skill) => TechnicianRepo::list_by_skill(&state.pool, skill).await?,
        None => TechnicianRepo::list(&state.pool).await?,
    };
    Ok(Json(DataResponse::new(technicians)))
}

/// GET /api/v1/technicians/{id}
pub async fn get_technician(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Technician>>> {
    let technician = TechnicianRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Technician",
            id,
        }))?;
    Ok(Json(DataResponse::new(technician)))
}

/// PUT /api/v1/technicians/{id}
pub async fn update_technician(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTechnician>,
) -> AppResult<Json<DataResponse<Technician>>> {
    let technician = TechnicianRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Technician",
            id,
        }))?;
    Ok(Json(DataResponse::new(technician)))
}

/// DELETE /api/v1/technicians/{id}
///
/// Soft delete: technicians carry work-order history, so the row is only
/// flagged inactive.
pub async fn deactivate_technician(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deactivated = TechnicianRepo::deactivate(&state.pool, id).await?;
    if !deactivated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Technician",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
