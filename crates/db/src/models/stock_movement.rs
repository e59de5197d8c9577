//! Stock movement model and DTOs.

use cmms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `stock_movements` table. Append-only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StockMovement {
    pub id: DbId,
    pub part_id: DbId,
    /// `in` or `out`.
    pub movement_type: String,
    /// Always positive; the sign comes from `movement_type`.
    pub quantity: i32,
    pub reason: Option<String>,
    /// Source reference, e.g. `WO-42` or `REQ-17`.
    pub reference: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for recording a manual stock adjustment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStockMovement {
    pub movement_type: String,
    pub quantity: i32,
    pub reason: Option<String>,
    pub reference: Option<String>,
}

/// A movement joined with the reconstructed stock level right after it landed.
#[derive(Debug, Clone, Serialize)]
pub struct MovementWithStock {
    #[serde(flatten)]
    pub movement: StockMovement,
    pub stock_after: i32,
}
