//! Refresh-token session rows.

use cmms_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from `user_sessions`. Holds only the SHA-256 digest of the refresh
/// token; the plaintext exists solely on the client.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
}

/// Input for opening a session at login or rotation.
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}
