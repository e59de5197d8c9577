//! Configuration taxonomy models and DTOs.

use cmms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `config_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConfigCategory {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `config_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConfigItem {
    pub id: DbId,
    pub category_id: DbId,
    /// Unique within its category.
    pub code: String,
    pub label: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new configuration category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateConfigCategory {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// DTO for creating a new configuration item within a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateConfigItem {
    pub code: String,
    pub label: String,
    pub sort_order: Option<i32>,
}

/// DTO for updating an existing configuration item.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateConfigItem {
    pub label: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}
