//! Repository for the `maintenance_schedules` table.
//!
//! Execution spawns a work order and advances the trigger state in one
//! transaction: the order insert and the schedule update commit together.

use cmms_core::error::CoreError;
use cmms_core::schedule::{
    self, TRIGGER_THRESHOLD_BASED, TRIGGER_TIME_BASED,
};
use cmms_core::types::DbId;
use cmms_core::validation::validate_name;
use cmms_core::work_order::validate_priority;
use sqlx::PgPool;

use crate::models::maintenance_schedule::{
    CreateMaintenanceSchedule, MaintenanceSchedule, UpdateMaintenanceSchedule,
};
use crate::models::work_order::WorkOrder;
use crate::tx::FlowError;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, asset_id, trigger_type, maintenance_type, \
    interval_days, next_due_at, metric_name, current_value, threshold_value, unit, \
    priority, estimated_duration_mins, assigned_to, is_active, last_executed_at, \
    created_at, updated_at";

const WO_COLUMNS: &str = "id, title, description, status, priority, order_type, asset_id, \
    schedule_id, assigned_to, scheduled_at, started_at, completed_at, \
    estimated_duration_mins, actual_duration_mins, labor_cost, material_cost, total_cost, \
    requires_approval, approved_by, approved_at, rejection_reason, cancellation_reason, \
    created_at, updated_at";

/// Provides CRUD and execution for maintenance schedules.
pub struct MaintenanceScheduleRepo;

impl MaintenanceScheduleRepo {
    /// Insert a new schedule, returning the created row.
    ///
    /// Time-based schedules require `interval_days`; threshold-based ones
    /// require `metric_name` and `threshold_value`. The maintenance type
    /// defaults per trigger (`preventive` / `predictive`).
    pub async fn create(
        pool: &PgPool,
        input: &CreateMaintenanceSchedule,
    ) -> Result<MaintenanceSchedule, FlowError> {
        validate_name("Schedule name", &input.name).map_err(CoreError::Validation)?;
        schedule::validate_trigger_type(&input.trigger_type).map_err(CoreError::Validation)?;
        if let Some(priority) = &input.priority {
            validate_priority(priority).map_err(CoreError::Validation)?;
        }
        match input.trigger_type.as_str() {
            TRIGGER_TIME_BASED => {
                if input.interval_days.is_none_or(|d| d <= 0) {
                    return Err(CoreError::Validation(
                        "Time-based schedules require a positive interval_days".into(),
                    )
                    .into());
                }
            }
            TRIGGER_THRESHOLD_BASED => {
                if input.metric_name.is_none() || input.threshold_value.is_none() {
                    return Err(CoreError::Validation(
                        "Threshold-based schedules require metric_name and threshold_value"
                            .into(),
                    )
                    .into());
                }
            }
            _ => unreachable!("validated above"),
        }

        sqlx::query_scalar::<_, DbId>("SELECT id FROM assets WHERE id = $1")
            .bind(input.asset_id)
            .fetch_optional(pool)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Asset",
                id: input.asset_id,
            })?;

        let maintenance_type = input
            .maintenance_type
            .clone()
            .unwrap_or_else(|| schedule::spawned_order_type(&input.trigger_type).to_string());

        let query = format!(
            "INSERT INTO maintenance_schedules
                (name, description, asset_id, trigger_type, maintenance_type, interval_days,
                 next_due_at, metric_name, threshold_value, unit, priority,
                 estimated_duration_mins, assigned_to)
             VALUES ($1, $2, $3, $4, $5, $6,
                     COALESCE($7, NOW() + make_interval(days => $6)),
                     $8, $9, $10, COALESCE($11, 'medium'), $12, $13)
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, MaintenanceSchedule>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(input.asset_id)
            .bind(&input.trigger_type)
            .bind(&maintenance_type)
            .bind(input.interval_days)
            .bind(input.next_due_at)
            .bind(&input.metric_name)
            .bind(input.threshold_value)
            .bind(&input.unit)
            .bind(&input.priority)
            .bind(input.estimated_duration_mins)
            .bind(input.assigned_to)
            .fetch_one(pool)
            .await?;
        Ok(created)
    }

    /// Find a schedule by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MaintenanceSchedule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM maintenance_schedules WHERE id = $1");
        sqlx::query_as::<_, MaintenanceSchedule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all schedules, active first, then by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<MaintenanceSchedule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM maintenance_schedules ORDER BY is_active DESC, name ASC"
        );
        sqlx::query_as::<_, MaintenanceSchedule>(&query)
            .fetch_all(pool)
            .await
    }

    /// List active schedules whose trigger has fired: time-based ones past
    /// their due date, threshold-based ones at or over their threshold.
    pub async fn list_due(pool: &PgPool) -> Result<Vec<MaintenanceSchedule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM maintenance_schedules
             WHERE is_active = true
               AND ((trigger_type = 'time_based' AND next_due_at <= NOW())
                 OR (trigger_type = 'threshold_based' AND current_value >= threshold_value))
             ORDER BY next_due_at ASC NULLS LAST"
        );
        sqlx::query_as::<_, MaintenanceSchedule>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update a schedule. Only non-`None` fields in `input` are applied;
    /// the trigger type is immutable.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMaintenanceSchedule,
    ) -> Result<Option<MaintenanceSchedule>, FlowError> {
        if let Some(name) = &input.name {
            validate_name("Schedule name", name).map_err(CoreError::Validation)?;
        }
        if let Some(priority) = &input.priority {
            validate_priority(priority).map_err(CoreError::Validation)?;
        }

        let query = format!(
            "UPDATE maintenance_schedules SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                interval_days = COALESCE($4, interval_days),
                next_due_at = COALESCE($5, next_due_at),
                metric_name = COALESCE($6, metric_name),
                threshold_value = COALESCE($7, threshold_value),
                unit = COALESCE($8, unit),
                priority = COALESCE($9, priority),
                estimated_duration_mins = COALESCE($10, estimated_duration_mins),
                assigned_to = COALESCE($11, assigned_to),
                is_active = COALESCE($12, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, MaintenanceSchedule>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.interval_days)
            .bind(input.next_due_at)
            .bind(&input.metric_name)
            .bind(input.threshold_value)
            .bind(&input.unit)
            .bind(&input.priority)
            .bind(input.estimated_duration_mins)
            .bind(input.assigned_to)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await?;
        Ok(updated)
    }

    /// Record a metric reading on a threshold-based schedule.
    ///
    /// Returns the updated schedule; the handler reports whether the
    /// threshold is now reached.
    pub async fn record_reading(
        pool: &PgPool,
        id: DbId,
        value: f64,
    ) -> Result<MaintenanceSchedule, FlowError> {
        let schedule_row = Self::find_by_id(pool, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "MaintenanceSchedule",
                id,
            })?;
        if schedule_row.trigger_type != TRIGGER_THRESHOLD_BASED {
            return Err(CoreError::Validation(
                "Readings can only be recorded on threshold-based schedules".into(),
            )
            .into());
        }

        let query = format!(
            "UPDATE maintenance_schedules SET current_value = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, MaintenanceSchedule>(&query)
            .bind(id)
            .bind(value)
            .fetch_one(pool)
            .await?;
        Ok(updated)
    }

    /// Execute a schedule: spawn one work order and advance the trigger.
    ///
    /// The schedule must exist and be active. The spawned order carries the
    /// trigger-specific title prefix, mirrors the schedule's maintenance
    /// type, and links back via `schedule_id`. Advancing the trigger
    /// (next due date, or counter reset) happens in the same transaction.
    pub async fn execute(pool: &PgPool, id: DbId) -> Result<WorkOrder, FlowError> {
        let mut tx = pool.begin().await?;

        let lock_query =
            format!("SELECT {COLUMNS} FROM maintenance_schedules WHERE id = $1 FOR UPDATE");
        let sched = sqlx::query_as::<_, MaintenanceSchedule>(&lock_query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "MaintenanceSchedule",
                id,
            })?;
        if !sched.is_active {
            return Err(
                CoreError::Conflict(format!("Maintenance schedule {id} is not active")).into(),
            );
        }

        let title = schedule::spawned_title(&sched.trigger_type, &sched.name);
        let description = schedule::spawned_description(
            &sched.trigger_type,
            sched.description.as_deref(),
            sched.metric_name.as_deref(),
            Some(sched.current_value),
            sched.threshold_value,
            sched.unit.as_deref(),
        );

        let insert_query = format!(
            "INSERT INTO work_orders
                (title, description, priority, order_type, asset_id, schedule_id,
                 assigned_to, scheduled_at, estimated_duration_mins)
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), $8)
             RETURNING {WO_COLUMNS}"
        );
        let order = sqlx::query_as::<_, WorkOrder>(&insert_query)
            .bind(&title)
            .bind(&description)
            .bind(&sched.priority)
            .bind(&sched.maintenance_type)
            .bind(sched.asset_id)
            .bind(sched.id)
            .bind(sched.assigned_to)
            .bind(sched.estimated_duration_mins)
            .fetch_one(&mut *tx)
            .await?;

        match sched.trigger_type.as_str() {
            TRIGGER_TIME_BASED => {
                sqlx::query(
                    "UPDATE maintenance_schedules SET
                        next_due_at = NOW() + make_interval(days => interval_days),
                        last_executed_at = NOW()
                     WHERE id = $1",
                )
                .bind(id)
                .execute(&mut *tx)
                .await?;
            }
            _ => {
                sqlx::query(
                    "UPDATE maintenance_schedules SET
                        current_value = 0,
                        last_executed_at = NOW()
                     WHERE id = $1",
                )
                .bind(id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(order)
    }

    /// Delete a schedule by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM maintenance_schedules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
