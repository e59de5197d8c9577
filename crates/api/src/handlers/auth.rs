//! Handlers for the `/auth` resource (login, refresh, logout, invites,
//! password change).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use cmms_core::error::CoreError;
use cmms_core::types::DbId;
use cmms_db::models::session::CreateSession;
use cmms_db::models::user::User;
use cmms_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Consecutive failed logins that trigger a temporary lock.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// How long a lock lasts, in minutes.
const LOCK_DURATION_MINS: i64 = 15;

/// Applied when an invite is redeemed and on password change.
pub const MIN_PASSWORD_LENGTH: usize = 12;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct AcceptInviteRequest {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Returned by login, refresh, and invite redemption.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// The caller-visible slice of the user row.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: String,
    pub must_change_password: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Unknown email, missing password, and wrong password all answer with the
/// same 401 message so the endpoint does not leak which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".into(),
            )));
        }
    }

    // An invited account without a password cannot log in yet.
    let stored_hash = user.password_hash.as_deref().ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
    })?;

    let password_valid = verify_password(&input.password, stored_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        UserRepo::increment_failed_login(&state.pool, user.id).await?;

        if user.failed_login_count + 1 >= MAX_FAILED_ATTEMPTS {
            let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
            UserRepo::lock_account(&state.pool, user.id, lock_until).await?;
            tracing::warn!(user_id = user.id, "Account locked after repeated failures");
        }

        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Rotates the refresh token: the presented one is revoked before a new pair
/// is issued, so a replayed token fails even if it has not expired.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    SessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout -- revokes every session the caller holds.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/accept-invite
///
/// Redeem an invite token and set the initial password. Public endpoint.
pub async fn accept_invite(
    State(state): State<AppState>,
    Json(input): Json<AcceptInviteRequest>,
) -> AppResult<Json<AuthResponse>> {
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let user = UserRepo::find_by_invite_token(&state.pool, &input.token)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired invite".into()))
        })?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::set_password(&state.pool, user.id, &hashed).await?;
    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/change-password
///
/// Change the authenticated user's password; revokes every other session.
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        }))?;

    let stored_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| AppError::Core(CoreError::Conflict("No password set yet".into())))?;

    let current_valid = verify_password(&input.current_password, stored_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::set_password(&state.pool, user.id, &hashed).await?;
    SessionRepo::revoke_all_for_user(&state.pool, user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Mint both tokens, open a session row for the refresh digest, and assemble
/// the response body.
async fn create_auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at,
            user_agent: None,
            ip_address: None,
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserInfo {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
            must_change_password: user.must_change_password,
        },
    })
}
