//! Repository for the `users` table.

use cmms_core::error::CoreError;
use cmms_core::roles::validate_role;
use cmms_core::types::{DbId, Timestamp};
use cmms_core::validation::{validate_email, validate_name};
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User};
use crate::tx::FlowError;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, name, role, password_hash, is_active, invite_token, \
    invite_expires_at, failed_login_count, locked_until, must_change_password, \
    last_login_at, created_at, updated_at";

/// Provides CRUD and credential bookkeeping for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new invited user, returning the created row.
    ///
    /// The account starts without a password; `invite_token` is redeemed to
    /// set one. Emails are stored lowercased.
    pub async fn create_invited(
        pool: &PgPool,
        input: &CreateUser,
        invite_token: &str,
        invite_expires_at: Timestamp,
    ) -> Result<User, FlowError> {
        validate_email(&input.email).map_err(CoreError::Validation)?;
        validate_name("User name", &input.name).map_err(CoreError::Validation)?;
        validate_role(&input.role).map_err(CoreError::Validation)?;

        let query = format!(
            "INSERT INTO users (email, name, role, invite_token, invite_expires_at)
             VALUES (LOWER($1), $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, User>(&query)
            .bind(input.email.trim())
            .bind(input.name.trim())
            .bind(&input.role)
            .bind(invite_token)
            .bind(invite_expires_at)
            .fetch_one(pool)
            .await?;
        Ok(created)
    }

    /// Insert a user with a password already set (bootstrap and tests).
    pub async fn create_with_password(
        pool: &PgPool,
        email: &str,
        name: &str,
        role: &str,
        password_hash: &str,
    ) -> Result<User, FlowError> {
        validate_email(email).map_err(CoreError::Validation)?;
        validate_name("User name", name).map_err(CoreError::Validation)?;
        validate_role(role).map_err(CoreError::Validation)?;

        let query = format!(
            "INSERT INTO users (email, name, role, password_hash)
             VALUES (LOWER($1), $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, User>(&query)
            .bind(email.trim())
            .bind(name.trim())
            .bind(role)
            .bind(password_hash)
            .fetch_one(pool)
            .await?;
        Ok(created)
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email.trim())
            .fetch_optional(pool)
            .await
    }

    /// Find a user by an unexpired invite token.
    pub async fn find_by_invite_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE invite_token = $1 AND invite_expires_at > NOW()"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// List all users ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, FlowError> {
        if let Some(name) = &input.name {
            validate_name("User name", name).map_err(CoreError::Validation)?;
        }
        if let Some(role) = &input.role {
            validate_role(role).map_err(CoreError::Validation)?;
        }

        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                role = COALESCE($3, role),
                is_active = COALESCE($4, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.role)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await?;
        Ok(updated)
    }

    /// Soft-deactivate a user by setting `is_active = false`.
    ///
    /// Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Increment the failed login counter by 1.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET failed_login_count = failed_login_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Lock a user account until the specified timestamp.
    pub async fn lock_account(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET locked_until = $2 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Record a successful login: reset `failed_login_count` to 0, clear
    /// `locked_until`, and set `last_login_at` to now.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET
                failed_login_count = 0,
                locked_until = NULL,
                last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Set a temporary password and flag the account so the next login must
    /// change it. Returns `true` if the row was updated.
    pub async fn reset_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                password_hash = $2,
                invite_token = NULL,
                invite_expires_at = NULL,
                must_change_password = true
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set a user's password hash, clearing any outstanding invite and the
    /// forced-change flag. Returns `true` if the row was updated.
    pub async fn set_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                password_hash = $2,
                invite_token = NULL,
                invite_expires_at = NULL,
                must_change_password = false
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
