//! Repository for the `work_orders` and `work_order_parts` tables.
//!
//! Lifecycle flows (create with part lines, start, complete, cancel) each run
//! inside one transaction so the work order, its lines, the movement ledger,
//! and the part stock levels commit together or not at all.

use cmms_core::error::CoreError;
use cmms_core::inventory::{MOVEMENT_IN, MOVEMENT_OUT};
use cmms_core::types::DbId;
use cmms_core::validation::{
    validate_name, validate_non_negative_price, validate_positive_quantity,
};
use cmms_core::work_order::{
    state_machine, validate_order_type, validate_priority, LINE_CANCELLED, LINE_CONSUMED,
    LINE_RESERVED, STATUS_CANCELLED, STATUS_COMPLETED, STATUS_IN_PROGRESS, STATUS_PENDING,
};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::part::Part;
use crate::models::work_order::{
    CancelWorkOrder, CompleteWorkOrder, CreateWorkOrder, UpdateWorkOrder, WorkOrder,
    WorkOrderListQuery, WorkOrderPart,
};
use crate::tx::FlowError;

const COLUMNS: &str = "id, title, description, status, priority, order_type, asset_id, \
    schedule_id, assigned_to, scheduled_at, started_at, completed_at, \
    estimated_duration_mins, actual_duration_mins, labor_cost, material_cost, total_cost, \
    requires_approval, approved_by, approved_at, rejection_reason, cancellation_reason, \
    created_at, updated_at";

const LINE_COLUMNS: &str = "id, work_order_id, part_id, quantity_planned, quantity_reserved, \
    quantity_consumed, unit_price, line_status, created_at";

const PART_COLUMNS: &str = "id, reference, name, category, unit_price, quantity_in_stock, \
    quantity_reserved, min_stock_level, supplier, location, created_at, updated_at";

/// Provides lifecycle flows and queries for work orders.
pub struct WorkOrderRepo;

impl WorkOrderRepo {
    /// Create a work order, reserving and deducting stock for its part lines.
    ///
    /// Validation is fail-fast, first violation wins: the asset must exist;
    /// an assigned technician must exist and be active; every part line must
    /// be fulfillable from available stock. All inserts (order, lines, `out`
    /// movements) and the stock decrements share one transaction. Stock is
    /// deducted here, at creation; completion only marks lines consumed.
    pub async fn create_with_parts(
        pool: &PgPool,
        created_by: Option<DbId>,
        input: &CreateWorkOrder,
    ) -> Result<WorkOrder, FlowError> {
        validate_name("Work order title", &input.title).map_err(CoreError::Validation)?;
        if let Some(priority) = &input.priority {
            validate_priority(priority).map_err(CoreError::Validation)?;
        }
        if let Some(order_type) = &input.order_type {
            validate_order_type(order_type).map_err(CoreError::Validation)?;
        }
        for line in &input.parts {
            validate_positive_quantity(line.quantity).map_err(CoreError::Validation)?;
            if let Some(price) = line.unit_price {
                validate_non_negative_price(price).map_err(CoreError::Validation)?;
            }
        }

        let mut tx = pool.begin().await?;

        sqlx::query_scalar::<_, DbId>("SELECT id FROM assets WHERE id = $1")
            .bind(input.asset_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Asset",
                id: input.asset_id,
            })?;

        if let Some(technician_id) = input.assigned_to {
            let is_active =
                sqlx::query_scalar::<_, bool>("SELECT is_active FROM technicians WHERE id = $1")
                    .bind(technician_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or(CoreError::NotFound {
                        entity: "Technician",
                        id: technician_id,
                    })?;
            if !is_active {
                return Err(CoreError::Validation(format!(
                    "Technician {technician_id} is not active"
                ))
                .into());
            }
        }

        // Lock and check every requested part before writing anything.
        let mut parts: Vec<Part> = Vec::with_capacity(input.parts.len());
        for line in &input.parts {
            let part_query = format!("SELECT {PART_COLUMNS} FROM parts WHERE id = $1 FOR UPDATE");
            let part = sqlx::query_as::<_, Part>(&part_query)
                .bind(line.part_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "Part",
                    id: line.part_id,
                })?;
            if !part.can_fulfill(line.quantity) {
                return Err(CoreError::InsufficientStock {
                    part_id: line.part_id,
                    available: part.available(),
                    requested: line.quantity,
                }
                .into());
            }
            parts.push(part);
        }

        let material_cost: f64 = input
            .parts
            .iter()
            .zip(&parts)
            .map(|(line, part)| {
                f64::from(line.quantity) * line.unit_price.unwrap_or(part.unit_price)
            })
            .sum();
        let labor_cost = input.labor_cost.unwrap_or(0.0);

        let insert_query = format!(
            "INSERT INTO work_orders
                (title, description, priority, order_type, asset_id, assigned_to,
                 scheduled_at, estimated_duration_mins, labor_cost, material_cost, total_cost,
                 requires_approval)
             VALUES ($1, $2, COALESCE($3, 'medium'), COALESCE($4, 'corrective'), $5, $6,
                     $7, $8, $9, $10, $11, COALESCE($12, false))
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, WorkOrder>(&insert_query)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(&input.priority)
            .bind(&input.order_type)
            .bind(input.asset_id)
            .bind(input.assigned_to)
            .bind(input.scheduled_at)
            .bind(input.estimated_duration_mins)
            .bind(labor_cost)
            .bind(material_cost)
            .bind(labor_cost + material_cost)
            .bind(input.requires_approval)
            .fetch_one(&mut *tx)
            .await?;

        for (line, part) in input.parts.iter().zip(&parts) {
            sqlx::query(
                "INSERT INTO work_order_parts
                    (work_order_id, part_id, quantity_planned, quantity_reserved, unit_price, line_status)
                 VALUES ($1, $2, $3, $3, $4, $5)",
            )
            .bind(order.id)
            .bind(line.part_id)
            .bind(line.quantity)
            .bind(line.unit_price.unwrap_or(part.unit_price))
            .bind(LINE_RESERVED)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO stock_movements (part_id, movement_type, quantity, reason, reference, created_by)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(line.part_id)
            .bind(MOVEMENT_OUT)
            .bind(line.quantity)
            .bind("Work order part reservation")
            .bind(format!("WO-{}", order.id))
            .bind(created_by)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "UPDATE parts SET quantity_in_stock = quantity_in_stock - $2 WHERE id = $1",
            )
            .bind(line.part_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(order)
    }

    /// Find a work order by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WorkOrder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM work_orders WHERE id = $1");
        sqlx::query_as::<_, WorkOrder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List work orders with optional status/asset/technician filters,
    /// newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &WorkOrderListQuery,
    ) -> Result<Vec<WorkOrder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM work_orders
             WHERE ($1::TEXT IS NULL OR status = $1)
               AND ($2::BIGINT IS NULL OR asset_id = $2)
               AND ($3::BIGINT IS NULL OR assigned_to = $3)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, WorkOrder>(&query)
            .bind(&filter.status)
            .bind(filter.asset_id)
            .bind(filter.assigned_to)
            .fetch_all(pool)
            .await
    }

    /// List the part lines attached to a work order.
    pub async fn list_parts(
        pool: &PgPool,
        work_order_id: DbId,
    ) -> Result<Vec<WorkOrderPart>, sqlx::Error> {
        let query = format!(
            "SELECT {LINE_COLUMNS} FROM work_order_parts
             WHERE work_order_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, WorkOrderPart>(&query)
            .bind(work_order_id)
            .fetch_all(pool)
            .await
    }

    /// Update a non-terminal work order. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkOrder,
    ) -> Result<WorkOrder, FlowError> {
        if let Some(title) = &input.title {
            validate_name("Work order title", title).map_err(CoreError::Validation)?;
        }
        if let Some(priority) = &input.priority {
            validate_priority(priority).map_err(CoreError::Validation)?;
        }

        let mut tx = pool.begin().await?;
        let order = Self::lock(&mut tx, id).await?;
        if state_machine::is_terminal(&order.status) {
            return Err(CoreError::Conflict(format!(
                "Work order {id} is {} and can no longer be edited",
                order.status
            ))
            .into());
        }

        let query = format!(
            "UPDATE work_orders SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                priority = COALESCE($4, priority),
                assigned_to = COALESCE($5, assigned_to),
                scheduled_at = COALESCE($6, scheduled_at),
                estimated_duration_mins = COALESCE($7, estimated_duration_mins),
                labor_cost = COALESCE($8, labor_cost),
                total_cost = COALESCE($8, labor_cost) + material_cost
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, WorkOrder>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.priority)
            .bind(input.assigned_to)
            .bind(input.scheduled_at)
            .bind(input.estimated_duration_mins)
            .bind(input.labor_cost)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Start work: `pending` -> `in_progress`, stamping `started_at`.
    pub async fn start(pool: &PgPool, id: DbId) -> Result<WorkOrder, FlowError> {
        let mut tx = pool.begin().await?;
        let order = Self::lock(&mut tx, id).await?;
        Self::check_transition(&order, STATUS_IN_PROGRESS)?;

        let query = format!(
            "UPDATE work_orders SET status = $2, started_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, WorkOrder>(&query)
            .bind(id)
            .bind(STATUS_IN_PROGRESS)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Complete a work order, consuming its open part lines.
    ///
    /// Valid from `pending` or `in_progress`. Every line still in
    /// `planned`/`reserved` status moves to `consumed` with
    /// `quantity_consumed = quantity_planned`; consumed or cancelled lines
    /// are untouched. Stock is not deducted again here.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        input: &CompleteWorkOrder,
    ) -> Result<WorkOrder, FlowError> {
        let mut tx = pool.begin().await?;
        let order = Self::lock(&mut tx, id).await?;
        Self::check_transition(&order, STATUS_COMPLETED)?;

        let query = format!(
            "UPDATE work_orders SET
                status = $2,
                completed_at = NOW(),
                actual_duration_mins = COALESCE($3, actual_duration_mins)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, WorkOrder>(&query)
            .bind(id)
            .bind(STATUS_COMPLETED)
            .bind(input.actual_duration_mins)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE work_order_parts SET
                quantity_consumed = quantity_planned,
                quantity_reserved = 0,
                line_status = $2
             WHERE work_order_id = $1 AND line_status IN ('planned', 'reserved')",
        )
        .bind(id)
        .bind(LINE_CONSUMED)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Cancel a work order, returning reserved line quantities to stock.
    ///
    /// Valid from `pending` or `in_progress`. Open lines move to `cancelled`
    /// and their reserved quantities come back via compensating `in`
    /// movements so the ledger stays append-only.
    pub async fn cancel(
        pool: &PgPool,
        id: DbId,
        input: &CancelWorkOrder,
    ) -> Result<WorkOrder, FlowError> {
        let mut tx = pool.begin().await?;
        let order = Self::lock(&mut tx, id).await?;
        Self::check_transition(&order, STATUS_CANCELLED)?;

        let updated = Self::cancel_locked(&mut tx, id, input.reason.as_deref()).await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Cancellation body shared by [`Self::cancel`] and [`Self::reject`].
    /// Caller holds the row lock and has validated the transition.
    async fn cancel_locked(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        reason: Option<&str>,
    ) -> Result<WorkOrder, FlowError> {
        let lines_query = format!(
            "SELECT {LINE_COLUMNS} FROM work_order_parts
             WHERE work_order_id = $1 AND line_status IN ('planned', 'reserved')
             ORDER BY id ASC"
        );
        let open_lines = sqlx::query_as::<_, WorkOrderPart>(&lines_query)
            .bind(id)
            .fetch_all(&mut **tx)
            .await?;

        for line in &open_lines {
            if line.quantity_reserved > 0 {
                sqlx::query(
                    "INSERT INTO stock_movements (part_id, movement_type, quantity, reason, reference)
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(line.part_id)
                .bind(MOVEMENT_IN)
                .bind(line.quantity_reserved)
                .bind("Work order cancelled, reservation returned")
                .bind(format!("WO-{id}"))
                .execute(&mut **tx)
                .await?;

                sqlx::query(
                    "UPDATE parts SET quantity_in_stock = quantity_in_stock + $2 WHERE id = $1",
                )
                .bind(line.part_id)
                .bind(line.quantity_reserved)
                .execute(&mut **tx)
                .await?;
            }
        }

        sqlx::query(
            "UPDATE work_order_parts SET line_status = $2, quantity_reserved = 0
             WHERE work_order_id = $1 AND line_status IN ('planned', 'reserved')",
        )
        .bind(id)
        .bind(LINE_CANCELLED)
        .execute(&mut **tx)
        .await?;

        let query = format!(
            "UPDATE work_orders SET status = $2, cancellation_reason = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, WorkOrder>(&query)
            .bind(id)
            .bind(STATUS_CANCELLED)
            .bind(reason)
            .fetch_one(&mut **tx)
            .await?;

        Ok(updated)
    }

    /// Approve a work order that requires approval. Must still be pending and
    /// not yet decided.
    pub async fn approve(pool: &PgPool, id: DbId, approver: DbId) -> Result<WorkOrder, FlowError> {
        let mut tx = pool.begin().await?;
        let order = Self::lock(&mut tx, id).await?;
        if !order.requires_approval {
            return Err(
                CoreError::Conflict(format!("Work order {id} does not require approval")).into(),
            );
        }
        if order.approved_by.is_some() || order.status != STATUS_PENDING {
            return Err(
                CoreError::Conflict(format!("Work order {id} has already been decided")).into(),
            );
        }

        let query = format!(
            "UPDATE work_orders SET approved_by = $2, approved_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, WorkOrder>(&query)
            .bind(id)
            .bind(approver)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Reject a work order that requires approval: records the reason and
    /// cancels the order (returning any reserved stock), all in one
    /// transaction.
    pub async fn reject(pool: &PgPool, id: DbId, reason: &str) -> Result<WorkOrder, FlowError> {
        if reason.trim().is_empty() {
            return Err(CoreError::Validation("A rejection reason is required".into()).into());
        }

        let mut tx = pool.begin().await?;
        let order = Self::lock(&mut tx, id).await?;
        if !order.requires_approval {
            return Err(
                CoreError::Conflict(format!("Work order {id} does not require approval")).into(),
            );
        }
        Self::check_transition(&order, STATUS_CANCELLED)?;

        sqlx::query("UPDATE work_orders SET rejection_reason = $2 WHERE id = $1")
            .bind(id)
            .bind(reason)
            .execute(&mut *tx)
            .await?;

        let updated = Self::cancel_locked(&mut tx, id, Some(reason)).await?;

        tx.commit().await?;
        Ok(updated)
    }

    // -- Internals ----------------------------------------------------------

    /// Fetch a work order under `FOR UPDATE` within the flow's transaction.
    async fn lock(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<WorkOrder, FlowError> {
        let query = format!("SELECT {COLUMNS} FROM work_orders WHERE id = $1 FOR UPDATE");
        let order = sqlx::query_as::<_, WorkOrder>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "WorkOrder",
                id,
            })?;
        Ok(order)
    }

    fn check_transition(order: &WorkOrder, to: &str) -> Result<(), FlowError> {
        if state_machine::can_transition(&order.status, to) {
            Ok(())
        } else {
            Err(Self::transition_error(order, to))
        }
    }

    fn transition_error(order: &WorkOrder, to: &str) -> FlowError {
        CoreError::InvalidTransition {
            entity: "WorkOrder",
            from: order.status.clone(),
            to: to.to_string(),
        }
        .into()
    }
}
