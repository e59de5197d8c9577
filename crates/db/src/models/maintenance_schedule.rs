//! Maintenance schedule model and DTOs.

use cmms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `maintenance_schedules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaintenanceSchedule {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub asset_id: DbId,
    /// `time_based` or `threshold_based`.
    pub trigger_type: String,
    /// `preventive` or `predictive`; mirrored onto spawned work orders.
    pub maintenance_type: String,
    pub interval_days: Option<i32>,
    pub next_due_at: Option<Timestamp>,
    pub metric_name: Option<String>,
    pub current_value: f64,
    pub threshold_value: Option<f64>,
    pub unit: Option<String>,
    pub priority: String,
    pub estimated_duration_mins: Option<i32>,
    pub assigned_to: Option<DbId>,
    pub is_active: bool,
    pub last_executed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new maintenance schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMaintenanceSchedule {
    pub name: String,
    pub description: Option<String>,
    pub asset_id: DbId,
    pub trigger_type: String,
    /// Defaults per trigger type: `preventive` for time-based, `predictive`
    /// for threshold-based.
    pub maintenance_type: Option<String>,
    pub interval_days: Option<i32>,
    pub next_due_at: Option<Timestamp>,
    pub metric_name: Option<String>,
    pub threshold_value: Option<f64>,
    pub unit: Option<String>,
    pub priority: Option<String>,
    pub estimated_duration_mins: Option<i32>,
    pub assigned_to: Option<DbId>,
}

/// DTO for updating an existing schedule. All fields are optional; trigger
/// type is immutable after creation.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMaintenanceSchedule {
    pub name: Option<String>,
    pub description: Option<String>,
    pub interval_days: Option<i32>,
    pub next_due_at: Option<Timestamp>,
    pub metric_name: Option<String>,
    pub threshold_value: Option<f64>,
    pub unit: Option<String>,
    pub priority: Option<String>,
    pub estimated_duration_mins: Option<i32>,
    pub assigned_to: Option<DbId>,
    pub is_active: Option<bool>,
}

/// Request body for recording a metric reading on a threshold-based schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordReading {
    pub value: f64,
}

/// Response for a recorded reading: the updated schedule plus whether the
/// threshold is now reached.
#[derive(Debug, Serialize)]
pub struct ReadingResult {
    pub schedule: MaintenanceSchedule,
    pub threshold_reached: bool,
}
