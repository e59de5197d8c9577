//! Technician model and DTOs.

use cmms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `technicians` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Technician {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Non-empty set of skill tags from the config taxonomy.
    pub skills: Vec<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new technician.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTechnician {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub skills: Vec<String>,
}

/// DTO for updating an existing technician. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTechnician {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Option<Vec<String>>,
    pub is_active: Option<bool>,
}
