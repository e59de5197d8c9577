//! Handlers for the `/admin/users` resource.
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use cmms_core::error::CoreError;
use cmms_core::types::DbId;
use cmms_db::models::user::{CreateUser, UpdateUser, UserView};
use cmms_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::MIN_PASSWORD_LENGTH;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Invite validity window in days.
const INVITE_EXPIRY_DAYS: i64 = 7;

/// Request body for `POST /admin/users/{id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

/// Response for a freshly created invite. The token is only ever returned
/// here; it is delivered to the user out of band.
#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub user: UserView,
    pub invite_token: String,
    pub invite_expires_at: chrono::DateTime<Utc>,
}

/// POST /api/v1/admin/users
///
/// Invite a new user. The account has no password until the invite is
/// accepted via `POST /auth/accept-invite`.
pub async fn invite_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<DataResponse<InviteResponse>>)> {
    let invite_token = Uuid::new_v4().to_string();
    let invite_expires_at = Utc::now() + chrono::Duration::days(INVITE_EXPIRY_DAYS);

    let user =
        UserRepo::create_invited(&state.pool, &input, &invite_token, invite_expires_at).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: InviteResponse {
                user: user.into(),
                invite_token,
                invite_expires_at,
            },
        }),
    ))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserView>>>> {
    let users = UserRepo::list(&state.pool).await?;
    let views = users.into_iter().map(UserView::from).collect();
    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserView>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// PUT /api/v1/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<UserView>>> {
    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Soft-deactivate: the user can no longer log in; sessions are revoked.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot deactivate your own account".into(),
        )));
    }
    let deactivated = UserRepo::deactivate(&state.pool, id).await?;
    if !deactivated {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/users/{id}/reset-password
///
/// Set a temporary password and force a change at next login.
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let updated = UserRepo::reset_password(&state.pool, id, &hashed).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
