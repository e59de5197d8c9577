//! Repository for the `parts` table.
//!
//! Stock levels are never mutated here; only the movement and work-order
//! flows touch `quantity_in_stock` / `quantity_reserved`.

use cmms_core::error::CoreError;
use cmms_core::types::DbId;
use cmms_core::validation::{normalize_reference, validate_name, validate_non_negative_price};
use sqlx::PgPool;

use crate::models::part::{CreatePart, Part, UpdatePart};
use crate::tx::FlowError;

const COLUMNS: &str = "id, reference, name, category, unit_price, quantity_in_stock, \
    quantity_reserved, min_stock_level, supplier, location, created_at, updated_at";

/// Provides CRUD operations for spare parts.
pub struct PartRepo;

impl PartRepo {
    /// Insert a new part, returning the created row.
    ///
    /// The reference is normalized (trimmed, uppercased) before insert and
    /// must be unique. Stock always starts at zero.
    pub async fn create(pool: &PgPool, input: &CreatePart) -> Result<Part, FlowError> {
        let reference = normalize_reference(&input.reference).map_err(CoreError::Validation)?;
        validate_name("Part name", &input.name).map_err(CoreError::Validation)?;
        if let Some(price) = input.unit_price {
            validate_non_negative_price(price).map_err(CoreError::Validation)?;
        }

        let query = format!(
            "INSERT INTO parts
                (reference, name, category, unit_price, min_stock_level, supplier, location)
             VALUES ($1, $2, COALESCE($3, 'consumable'), COALESCE($4, 0), COALESCE($5, 5), $6, $7)
             RETURNING {COLUMNS}"
        );
        let part = sqlx::query_as::<_, Part>(&query)
            .bind(&reference)
            .bind(input.name.trim())
            .bind(&input.category)
            .bind(input.unit_price)
            .bind(input.min_stock_level)
            .bind(&input.supplier)
            .bind(&input.location)
            .fetch_one(pool)
            .await?;
        Ok(part)
    }

    /// Find a part by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Part>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parts WHERE id = $1");
        sqlx::query_as::<_, Part>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a part by its normalized reference.
    pub async fn find_by_reference(
        pool: &PgPool,
        reference: &str,
    ) -> Result<Option<Part>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parts WHERE reference = $1");
        sqlx::query_as::<_, Part>(&query)
            .bind(reference.trim().to_uppercase())
            .fetch_optional(pool)
            .await
    }

    /// List all parts ordered by reference.
    pub async fn list(pool: &PgPool) -> Result<Vec<Part>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parts ORDER BY reference ASC");
        sqlx::query_as::<_, Part>(&query).fetch_all(pool).await
    }

    /// List parts at or below their reorder threshold.
    pub async fn list_low_stock(pool: &PgPool) -> Result<Vec<Part>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM parts
             WHERE quantity_in_stock <= min_stock_level
             ORDER BY reference ASC"
        );
        sqlx::query_as::<_, Part>(&query).fetch_all(pool).await
    }

    /// Update a part's descriptive fields. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePart,
    ) -> Result<Option<Part>, FlowError> {
        if let Some(name) = &input.name {
            validate_name("Part name", name).map_err(CoreError::Validation)?;
        }
        if let Some(price) = input.unit_price {
            validate_non_negative_price(price).map_err(CoreError::Validation)?;
        }

        let query = format!(
            "UPDATE parts SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                unit_price = COALESCE($4, unit_price),
                min_stock_level = COALESCE($5, min_stock_level),
                supplier = COALESCE($6, supplier),
                location = COALESCE($7, location)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let part = sqlx::query_as::<_, Part>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.category)
            .bind(input.unit_price)
            .bind(input.min_stock_level)
            .bind(&input.supplier)
            .bind(&input.location)
            .fetch_optional(pool)
            .await?;
        Ok(part)
    }

    /// Delete a part by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM parts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
