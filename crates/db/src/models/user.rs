//! User account model and DTOs.

use cmms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
///
/// `password_hash` stays out of serialized output; the API exposes users only
/// through [`UserView`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: String,
    /// `None` until the invite is accepted and a password set.
    pub password_hash: Option<String>,
    pub is_active: bool,
    pub invite_token: Option<String>,
    pub invite_expires_at: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub must_change_password: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Transport-safe projection of a user (no credential fields).
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: String,
    pub is_active: bool,
    pub must_change_password: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            is_active: user.is_active,
            must_change_password: user.must_change_password,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// DTO for inviting a new user. The invite token and expiry are generated by
/// the handler; the password is set when the invite is accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub role: String,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}
