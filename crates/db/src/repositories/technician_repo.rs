//! Repository for the `technicians` table.

use cmms_core::error::CoreError;
use cmms_core::types::DbId;
use cmms_core::validation::{validate_email, validate_name};
use sqlx::PgPool;

use crate::models::technician::{CreateTechnician, Technician, UpdateTechnician};
use crate::tx::FlowError;

const COLUMNS: &str = "id, name, email, phone, skills, is_active, created_at, updated_at";

/// Provides CRUD operations for technicians.
pub struct TechnicianRepo;

impl TechnicianRepo {
    /// Insert a new technician, returning the created row.
    ///
    /// Requires a valid name, email, and a non-empty skill set. The skill
    /// taxonomy itself lives in the config items and is not checked here.
    pub async fn create(pool: &PgPool, input: &CreateTechnician) -> Result<Technician, FlowError> {
        validate_name("Technician name", &input.name).map_err(CoreError::Validation)?;
        validate_email(&input.email).map_err(CoreError::Validation)?;
        if input.skills.is_empty() {
            return Err(CoreError::Validation(
                "Technician must have at least one skill".into(),
            )
            .into());
        }

        let query = format!(
            "INSERT INTO technicians (name, email, phone, skills)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let technician = sqlx::query_as::<_, Technician>(&query)
            .bind(input.name.trim())
            .bind(input.email.trim())
            .bind(&input.phone)
            .bind(&input.skills)
            .fetch_one(pool)
            .await?;
        Ok(technician)
    }

    /// Find a technician by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Technician>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM technicians WHERE id = $1");
        sqlx::query_as::<_, Technician>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all technicians, active first, then by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Technician>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM technicians ORDER BY is_active DESC, name ASC"
        );
        sqlx::query_as::<_, Technician>(&query).fetch_all(pool).await
    }

    /// List active technicians carrying a given skill tag.
    pub async fn list_by_skill(pool: &PgPool, skill: &str) -> Result<Vec<Technician>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM technicians
             WHERE is_active = true AND $1 = ANY(skills)
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, Technician>(&query)
            .bind(skill)
            .fetch_all(pool)
            .await
    }

    /// Update a technician. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTechnician,
    ) -> Result<Option<Technician>, FlowError> {
        if let Some(name) = &input.name {
            validate_name("Technician name", name).map_err(CoreError::Validation)?;
        }
        if let Some(email) = &input.email {
            validate_email(email).map_err(CoreError::Validation)?;
        }
        if let Some(skills) = &input.skills {
            if skills.is_empty() {
                return Err(CoreError::Validation(
                    "Technician must have at least one skill".into(),
                )
                .into());
            }
        }

        let query = format!(
            "UPDATE technicians SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                skills = COALESCE($5, skills),
                is_active = COALESCE($6, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let technician = sqlx::query_as::<_, Technician>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.skills)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await?;
        Ok(technician)
    }

    /// Deactivate a technician. Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE technicians SET is_active = false WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
