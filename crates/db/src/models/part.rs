//! Spare part model and DTOs.

use cmms_core::inventory;
use cmms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `parts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Part {
    pub id: DbId,
    /// Uppercased, unique part reference (e.g. `BRG-6204`).
    pub reference: String,
    pub name: String,
    pub category: String,
    pub unit_price: f64,
    pub quantity_in_stock: i32,
    /// Stock held by approved-but-undelivered part requests.
    pub quantity_reserved: i32,
    pub min_stock_level: i32,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Part {
    /// Stock available for new reservations or work-order plans.
    pub fn available(&self) -> i32 {
        inventory::available(self.quantity_in_stock, self.quantity_reserved)
    }

    /// Whether the part is at or below its reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        inventory::is_low_stock(self.quantity_in_stock, self.min_stock_level)
    }

    /// Whether any stock is on hand at all.
    pub fn has_stock(&self) -> bool {
        inventory::has_stock(self.quantity_in_stock)
    }

    /// Whether available stock covers a requested quantity.
    pub fn can_fulfill(&self, requested: i32) -> bool {
        inventory::can_fulfill(self.quantity_in_stock, self.quantity_reserved, requested)
    }
}

/// DTO for creating a new part. Stock always starts at zero; initial stock is
/// recorded through an `in` movement so the ledger stays complete.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePart {
    pub reference: String,
    pub name: String,
    /// Defaults to `consumable` if omitted.
    pub category: Option<String>,
    pub unit_price: Option<f64>,
    pub min_stock_level: Option<i32>,
    pub supplier: Option<String>,
    pub location: Option<String>,
}

/// DTO for updating an existing part. All fields are optional; stock levels
/// are never updated here, only through movements.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePart {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit_price: Option<f64>,
    pub min_stock_level: Option<i32>,
    pub supplier: Option<String>,
    pub location: Option<String>,
}
