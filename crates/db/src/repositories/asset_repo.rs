//! Repository for the `assets` table.

use cmms_core::error::CoreError;
use cmms_core::types::DbId;
use cmms_core::validation::validate_name;
use sqlx::PgPool;

use crate::models::asset::{Asset, CreateAsset, UpdateAsset};
use crate::tx::FlowError;

const COLUMNS: &str = "id, name, serial_number, status, parent_id, asset_type, \
    location, manufacturer, model_number, created_at, updated_at";

/// Provides CRUD operations for assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Insert a new asset, returning the created row.
    ///
    /// The parent, if given, must exist. Status defaults to `running`.
    pub async fn create(pool: &PgPool, input: &CreateAsset) -> Result<Asset, FlowError> {
        validate_name("Asset name", &input.name).map_err(CoreError::Validation)?;

        if let Some(parent_id) = input.parent_id {
            Self::find_by_id(pool, parent_id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "Asset",
                    id: parent_id,
                })?;
        }

        let query = format!(
            "INSERT INTO assets
                (name, serial_number, status, parent_id, asset_type, location, manufacturer, model_number)
             VALUES ($1, $2, COALESCE($3, 'running'), $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let asset = sqlx::query_as::<_, Asset>(&query)
            .bind(input.name.trim())
            .bind(&input.serial_number)
            .bind(&input.status)
            .bind(input.parent_id)
            .bind(&input.asset_type)
            .bind(&input.location)
            .bind(&input.manufacturer)
            .bind(&input.model_number)
            .fetch_one(pool)
            .await?;
        Ok(asset)
    }

    /// Find an asset by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all assets ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets ORDER BY name ASC");
        sqlx::query_as::<_, Asset>(&query).fetch_all(pool).await
    }

    /// List direct children of an asset in the tree.
    pub async fn list_children(pool: &PgPool, parent_id: DbId) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE parent_id = $1 ORDER BY name ASC");
        sqlx::query_as::<_, Asset>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Update an asset. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, FlowError> {
        if let Some(name) = &input.name {
            validate_name("Asset name", name).map_err(CoreError::Validation)?;
        }

        let query = format!(
            "UPDATE assets SET
                name = COALESCE($2, name),
                serial_number = COALESCE($3, serial_number),
                status = COALESCE($4, status),
                parent_id = COALESCE($5, parent_id),
                asset_type = COALESCE($6, asset_type),
                location = COALESCE($7, location),
                manufacturer = COALESCE($8, manufacturer),
                model_number = COALESCE($9, model_number)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let asset = sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.serial_number)
            .bind(&input.status)
            .bind(input.parent_id)
            .bind(&input.asset_type)
            .bind(&input.location)
            .bind(&input.manufacturer)
            .bind(&input.model_number)
            .fetch_optional(pool)
            .await?;
        Ok(asset)
    }

    /// Delete an asset by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
