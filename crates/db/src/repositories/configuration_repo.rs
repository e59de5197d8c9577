//! Repository for the configuration taxonomy (`config_categories` and
//! `config_items`).

use cmms_core::error::CoreError;
use cmms_core::types::DbId;
use sqlx::PgPool;

use crate::models::configuration::{
    ConfigCategory, ConfigItem, CreateConfigCategory, CreateConfigItem, UpdateConfigItem,
};
use crate::tx::FlowError;

const CATEGORY_COLUMNS: &str = "id, code, name, description, created_at, updated_at";
const ITEM_COLUMNS: &str =
    "id, category_id, code, label, sort_order, is_active, created_at, updated_at";

/// Provides CRUD operations for the configuration taxonomy.
pub struct ConfigRepo;

impl ConfigRepo {
    /// Insert a new category, returning the created row.
    pub async fn create_category(
        pool: &PgPool,
        input: &CreateConfigCategory,
    ) -> Result<ConfigCategory, FlowError> {
        if input.code.trim().is_empty() {
            return Err(CoreError::Validation("Category code is required".into()).into());
        }
        let query = format!(
            "INSERT INTO config_categories (code, name, description)
             VALUES ($1, $2, $3)
             RETURNING {CATEGORY_COLUMNS}"
        );
        let created = sqlx::query_as::<_, ConfigCategory>(&query)
            .bind(input.code.trim())
            .bind(input.name.trim())
            .bind(&input.description)
            .fetch_one(pool)
            .await?;
        Ok(created)
    }

    /// List all categories ordered by code.
    pub async fn list_categories(pool: &PgPool) -> Result<Vec<ConfigCategory>, sqlx::Error> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM config_categories ORDER BY code ASC");
        sqlx::query_as::<_, ConfigCategory>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find a category by its code.
    pub async fn find_category_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<ConfigCategory>, sqlx::Error> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM config_categories WHERE code = $1");
        sqlx::query_as::<_, ConfigCategory>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new item within a category, returning the created row.
    pub async fn create_item(
        pool: &PgPool,
        category_id: DbId,
        input: &CreateConfigItem,
    ) -> Result<ConfigItem, FlowError> {
        if input.code.trim().is_empty() {
            return Err(CoreError::Validation("Item code is required".into()).into());
        }
        sqlx::query_scalar::<_, DbId>("SELECT id FROM config_categories WHERE id = $1")
            .bind(category_id)
            .fetch_optional(pool)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ConfigCategory",
                id: category_id,
            })?;

        let query = format!(
            "INSERT INTO config_items (category_id, code, label, sort_order)
             VALUES ($1, $2, $3, COALESCE($4, 0))
             RETURNING {ITEM_COLUMNS}"
        );
        let created = sqlx::query_as::<_, ConfigItem>(&query)
            .bind(category_id)
            .bind(input.code.trim())
            .bind(input.label.trim())
            .bind(input.sort_order)
            .fetch_one(pool)
            .await?;
        Ok(created)
    }

    /// List a category's items, active first, by sort order then label.
    pub async fn list_items(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<ConfigItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM config_items
             WHERE category_id = $1
             ORDER BY is_active DESC, sort_order ASC, label ASC"
        );
        sqlx::query_as::<_, ConfigItem>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// Update an item. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_item(
        pool: &PgPool,
        id: DbId,
        input: &UpdateConfigItem,
    ) -> Result<Option<ConfigItem>, sqlx::Error> {
        let query = format!(
            "UPDATE config_items SET
                label = COALESCE($2, label),
                sort_order = COALESCE($3, sort_order),
                is_active = COALESCE($4, is_active)
             WHERE id = $1
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, ConfigItem>(&query)
            .bind(id)
            .bind(&input.label)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete an item by ID. Returns `true` if a row was removed.
    pub async fn delete_item(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM config_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
