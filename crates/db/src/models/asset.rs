//! Asset entity model and DTOs.

use cmms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub name: String,
    pub serial_number: Option<String>,
    pub status: String,
    /// Parent in the asset tree (site -> building -> line -> machine -> component).
    pub parent_id: Option<DbId>,
    pub asset_type: Option<String>,
    pub location: Option<String>,
    pub manufacturer: Option<String>,
    pub model_number: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new asset.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAsset {
    pub name: String,
    pub serial_number: Option<String>,
    /// Defaults to `running` if omitted.
    pub status: Option<String>,
    pub parent_id: Option<DbId>,
    pub asset_type: Option<String>,
    pub location: Option<String>,
    pub manufacturer: Option<String>,
    pub model_number: Option<String>,
}

/// DTO for updating an existing asset. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAsset {
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub status: Option<String>,
    pub parent_id: Option<DbId>,
    pub asset_type: Option<String>,
    pub location: Option<String>,
    pub manufacturer: Option<String>,
    pub model_number: Option<String>,
}
