//! Role gates built on top of [`AuthUser`].
//!
//! Each gate is a newtype extractor, so a handler's signature states its
//! authorization requirement and an unauthenticated or under-privileged
//! request never reaches the handler body.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cmms_core::error::CoreError;
use cmms_core::roles::{ROLE_ADMIN, ROLE_MANAGER};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

fn forbidden(msg: &str) -> AppError {
    AppError::Core(CoreError::Forbidden(msg.to_string()))
}

/// Admin only. User management and nothing else needs this.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(forbidden("Admin role required"));
        }
        Ok(RequireAdmin(user))
    }
}

/// Manager or admin. Guards registry writes, approvals, deliveries,
/// schedule execution, and configuration changes.
pub struct RequireManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN && user.role != ROLE_MANAGER {
            return Err(forbidden("Manager or Admin role required"));
        }
        Ok(RequireManager(user))
    }
}

/// Any valid token. Same as using [`AuthUser`] directly, but the name makes
/// the route definition read as an explicit authorization decision.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(RequireAuth(AuthUser::from_request_parts(parts, state).await?))
    }
}
