//! Part request model and DTOs.

use cmms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `part_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PartRequest {
    pub id: DbId,
    pub part_id: DbId,
    pub quantity: i32,
    pub urgency: String,
    pub reason: Option<String>,
    pub status: String,
    pub requested_by: Option<DbId>,
    /// Decision metadata: who approved or rejected, and when.
    pub approved_by: Option<DbId>,
    pub approved_at: Option<Timestamp>,
    pub rejection_reason: Option<String>,
    pub delivered_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new part request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePartRequest {
    pub part_id: DbId,
    pub quantity: i32,
    /// Defaults to `normal` if omitted.
    pub urgency: Option<String>,
    pub reason: Option<String>,
}

/// Request body for rejecting a part request. A non-empty reason is required.
#[derive(Debug, Clone, Deserialize)]
pub struct RejectPartRequest {
    pub reason: String,
}
