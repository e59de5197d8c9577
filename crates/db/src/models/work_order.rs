//! Work order and part line models and DTOs.

use cmms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `work_orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkOrder {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub order_type: String,
    pub asset_id: DbId,
    /// Originating maintenance schedule, when spawned by one.
    pub schedule_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub scheduled_at: Option<Timestamp>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub estimated_duration_mins: Option<i32>,
    pub actual_duration_mins: Option<i32>,
    pub labor_cost: f64,
    pub material_cost: f64,
    pub total_cost: f64,
    pub requires_approval: bool,
    pub approved_by: Option<DbId>,
    pub approved_at: Option<Timestamp>,
    pub rejection_reason: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `work_order_parts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkOrderPart {
    pub id: DbId,
    pub work_order_id: DbId,
    pub part_id: DbId,
    pub quantity_planned: i32,
    pub quantity_reserved: i32,
    pub quantity_consumed: i32,
    pub unit_price: f64,
    pub line_status: String,
    pub created_at: Timestamp,
}

/// One requested part line on work-order creation.
#[derive(Debug, Clone, Deserialize)]
pub struct PartLineInput {
    pub part_id: DbId,
    pub quantity: i32,
    /// Defaults to the part's current unit price if omitted.
    pub unit_price: Option<f64>,
}

/// DTO for creating a new work order, optionally with part lines.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkOrder {
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `medium` if omitted.
    pub priority: Option<String>,
    /// Defaults to `corrective` if omitted.
    pub order_type: Option<String>,
    pub asset_id: DbId,
    pub assigned_to: Option<DbId>,
    pub scheduled_at: Option<Timestamp>,
    pub estimated_duration_mins: Option<i32>,
    pub labor_cost: Option<f64>,
    pub requires_approval: Option<bool>,
    #[serde(default)]
    pub parts: Vec<PartLineInput>,
}

/// DTO for updating a non-terminal work order. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWorkOrder {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub assigned_to: Option<DbId>,
    pub scheduled_at: Option<Timestamp>,
    pub estimated_duration_mins: Option<i32>,
    pub labor_cost: Option<f64>,
}

/// Request body for completing a work order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompleteWorkOrder {
    pub actual_duration_mins: Option<i32>,
}

/// Request body for cancelling a work order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelWorkOrder {
    pub reason: Option<String>,
}

/// Optional status/asset filters for listing work orders.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkOrderListQuery {
    pub status: Option<String>,
    pub asset_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
}
