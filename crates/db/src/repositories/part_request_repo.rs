//! Repository for the `part_requests` table.
//!
//! Approval places a reservation on the part (`quantity_reserved`), delivery
//! converts the reservation into an `out` stock movement, and rejection or
//! cancellation releases it. Every decision runs in one transaction with the
//! part row locked so concurrent approvals cannot over-commit stock.

use cmms_core::error::CoreError;
use cmms_core::part_request::{
    state_machine, validate_urgency, STATUS_APPROVED, STATUS_CANCELLED, STATUS_DELIVERED,
    STATUS_REJECTED, URGENCY_NORMAL,
};
use cmms_core::types::DbId;
use cmms_core::validation::validate_positive_quantity;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::part::Part;
use crate::models::part_request::{CreatePartRequest, PartRequest};
use crate::tx::FlowError;

const COLUMNS: &str = "id, part_id, quantity, urgency, reason, status, requested_by, \
    approved_by, approved_at, rejection_reason, delivered_at, created_at, updated_at";

const PART_COLUMNS: &str = "id, reference, name, category, unit_price, quantity_in_stock, \
    quantity_reserved, min_stock_level, supplier, location, created_at, updated_at";

/// Provides CRUD and the approval workflow for part requests.
pub struct PartRequestRepo;

impl PartRequestRepo {
    /// Insert a new request in `pending` state.
    ///
    /// The part must exist; stock is not checked here, only at approval.
    pub async fn create(
        pool: &PgPool,
        requested_by: Option<DbId>,
        input: &CreatePartRequest,
    ) -> Result<PartRequest, FlowError> {
        validate_positive_quantity(input.quantity).map_err(CoreError::Validation)?;
        let urgency = input.urgency.as_deref().unwrap_or(URGENCY_NORMAL);
        validate_urgency(urgency).map_err(CoreError::Validation)?;

        sqlx::query_scalar::<_, DbId>("SELECT id FROM parts WHERE id = $1")
            .bind(input.part_id)
            .fetch_optional(pool)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Part",
                id: input.part_id,
            })?;

        let query = format!(
            "INSERT INTO part_requests (part_id, quantity, urgency, reason, requested_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, PartRequest>(&query)
            .bind(input.part_id)
            .bind(input.quantity)
            .bind(urgency)
            .bind(&input.reason)
            .bind(requested_by)
            .fetch_one(pool)
            .await?;
        Ok(created)
    }

    /// Find a request by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PartRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM part_requests WHERE id = $1");
        sqlx::query_as::<_, PartRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List requests, optionally filtered by status, newest first.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
    ) -> Result<Vec<PartRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM part_requests
             WHERE $1::TEXT IS NULL OR status = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, PartRequest>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// List requests raised by a given user, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<PartRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM part_requests
             WHERE requested_by = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, PartRequest>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Approve a pending request, reserving stock on the part.
    ///
    /// Fails with `InsufficientStock` when available stock (on hand minus
    /// already-reserved) does not cover the requested quantity.
    pub async fn approve(
        pool: &PgPool,
        id: DbId,
        approved_by: DbId,
    ) -> Result<PartRequest, FlowError> {
        let mut tx = pool.begin().await?;

        let request = Self::lock(&mut tx, id).await?;
        Self::check_transition(&request, STATUS_APPROVED)?;

        let part = Self::lock_part(&mut tx, request.part_id).await?;
        if !part.can_fulfill(request.quantity) {
            return Err(CoreError::InsufficientStock {
                part_id: part.id,
                available: part.available(),
                requested: request.quantity,
            }
            .into());
        }

        sqlx::query("UPDATE parts SET quantity_reserved = quantity_reserved + $2 WHERE id = $1")
            .bind(part.id)
            .bind(request.quantity)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "UPDATE part_requests SET status = $2, approved_by = $3, approved_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let approved = sqlx::query_as::<_, PartRequest>(&query)
            .bind(id)
            .bind(STATUS_APPROVED)
            .bind(approved_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(approved)
    }

    /// Reject a pending request. A non-empty reason is required; no stock is
    /// touched since nothing was reserved yet.
    pub async fn reject(
        pool: &PgPool,
        id: DbId,
        rejected_by: DbId,
        reason: &str,
    ) -> Result<PartRequest, FlowError> {
        if reason.trim().is_empty() {
            return Err(CoreError::Validation("Rejection reason is required".into()).into());
        }

        let mut tx = pool.begin().await?;

        let request = Self::lock(&mut tx, id).await?;
        Self::check_transition(&request, STATUS_REJECTED)?;

        let query = format!(
            "UPDATE part_requests SET status = $2, approved_by = $3, approved_at = NOW(),
                rejection_reason = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let rejected = sqlx::query_as::<_, PartRequest>(&query)
            .bind(id)
            .bind(STATUS_REJECTED)
            .bind(rejected_by)
            .bind(reason.trim())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(rejected)
    }

    /// Mark an approved request as delivered.
    ///
    /// Consumes the reservation: stock and reserved both drop by the
    /// requested quantity, and an `out` movement is appended to the ledger.
    pub async fn deliver(
        pool: &PgPool,
        id: DbId,
        delivered_by: Option<DbId>,
    ) -> Result<PartRequest, FlowError> {
        let mut tx = pool.begin().await?;

        let request = Self::lock(&mut tx, id).await?;
        Self::check_transition(&request, STATUS_DELIVERED)?;

        let part = Self::lock_part(&mut tx, request.part_id).await?;

        sqlx::query(
            "INSERT INTO stock_movements (part_id, movement_type, quantity, reason, reference, created_by)
             VALUES ($1, 'out', $2, 'Part request delivered', $3, $4)",
        )
        .bind(part.id)
        .bind(request.quantity)
        .bind(format!("PR-{id}"))
        .bind(delivered_by)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE parts SET quantity_in_stock = quantity_in_stock - $2,
                quantity_reserved = quantity_reserved - $2
             WHERE id = $1",
        )
        .bind(part.id)
        .bind(request.quantity)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "UPDATE part_requests SET status = $2, delivered_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let delivered = sqlx::query_as::<_, PartRequest>(&query)
            .bind(id)
            .bind(STATUS_DELIVERED)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(delivered)
    }

    /// Cancel a pending or approved request. Cancelling an approved request
    /// releases its reservation.
    pub async fn cancel(pool: &PgPool, id: DbId) -> Result<PartRequest, FlowError> {
        let mut tx = pool.begin().await?;

        let request = Self::lock(&mut tx, id).await?;
        Self::check_transition(&request, STATUS_CANCELLED)?;

        if request.status == STATUS_APPROVED {
            sqlx::query(
                "UPDATE parts SET quantity_reserved = quantity_reserved - $2 WHERE id = $1",
            )
            .bind(request.part_id)
            .bind(request.quantity)
            .execute(&mut *tx)
            .await?;
        }

        let query = format!(
            "UPDATE part_requests SET status = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let cancelled = sqlx::query_as::<_, PartRequest>(&query)
            .bind(id)
            .bind(STATUS_CANCELLED)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(cancelled)
    }

    async fn lock(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<PartRequest, FlowError> {
        let query = format!("SELECT {COLUMNS} FROM part_requests WHERE id = $1 FOR UPDATE");
        let request = sqlx::query_as::<_, PartRequest>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "PartRequest",
                id,
            })?;
        Ok(request)
    }

    async fn lock_part(
        tx: &mut Transaction<'_, Postgres>,
        part_id: DbId,
    ) -> Result<Part, FlowError> {
        let query = format!("SELECT {PART_COLUMNS} FROM parts WHERE id = $1 FOR UPDATE");
        let part = sqlx::query_as::<_, Part>(&query)
            .bind(part_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Part",
                id: part_id,
            })?;
        Ok(part)
    }

    fn check_transition(request: &PartRequest, to: &str) -> Result<(), FlowError> {
        if state_machine::can_transition(&request.status, to) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                entity: "PartRequest",
                from: request.status.clone(),
                to: to.to_string(),
            }
            .into())
        }
    }
}
