//! Repository for the `stock_movements` ledger.

use cmms_core::error::CoreError;
use cmms_core::inventory;
use cmms_core::types::DbId;
use cmms_core::validation::validate_positive_quantity;
use sqlx::PgPool;

use crate::models::part::Part;
use crate::models::stock_movement::{CreateStockMovement, MovementWithStock, StockMovement};
use crate::tx::FlowError;

const COLUMNS: &str =
    "id, part_id, movement_type, quantity, reason, reference, created_by, created_at";

const PART_COLUMNS: &str = "id, reference, name, category, unit_price, quantity_in_stock, \
    quantity_reserved, min_stock_level, supplier, location, created_at, updated_at";

/// Provides movement recording and history reconstruction.
pub struct StockMovementRepo;

impl StockMovementRepo {
    /// Record a stock adjustment, applying it to the part's stock level.
    ///
    /// Runs in a single transaction: the part row is locked, the signed delta
    /// is validated (an `out` movement may not take available stock below
    /// zero), the movement is appended, and the level is updated. Both writes
    /// commit together or not at all.
    pub async fn apply(
        pool: &PgPool,
        part_id: DbId,
        created_by: Option<DbId>,
        input: &CreateStockMovement,
    ) -> Result<StockMovement, FlowError> {
        inventory::validate_movement_type(&input.movement_type)
            .map_err(CoreError::Validation)?;
        validate_positive_quantity(input.quantity).map_err(CoreError::Validation)?;

        let mut tx = pool.begin().await?;

        let part_query = format!("SELECT {PART_COLUMNS} FROM parts WHERE id = $1 FOR UPDATE");
        let part = sqlx::query_as::<_, Part>(&part_query)
            .bind(part_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Part",
                id: part_id,
            })?;

        // Outbound movements draw on available stock only; reserved
        // quantities belong to approved part requests.
        if input.movement_type == inventory::MOVEMENT_OUT && !part.can_fulfill(input.quantity) {
            return Err(CoreError::InsufficientStock {
                part_id,
                available: part.available(),
                requested: input.quantity,
            }
            .into());
        }

        let movement_query = format!(
            "INSERT INTO stock_movements (part_id, movement_type, quantity, reason, reference, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let movement = sqlx::query_as::<_, StockMovement>(&movement_query)
            .bind(part_id)
            .bind(&input.movement_type)
            .bind(input.quantity)
            .bind(&input.reason)
            .bind(&input.reference)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        let delta = inventory::signed_quantity(&input.movement_type, input.quantity);
        sqlx::query("UPDATE parts SET quantity_in_stock = quantity_in_stock + $2 WHERE id = $1")
            .bind(part_id)
            .bind(delta)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(movement)
    }

    /// List a part's movements ascending by time, each annotated with the
    /// stock level right after it landed.
    ///
    /// The levels are back-computed from the current stock by undoing each
    /// movement in reverse chronological order, so no running ledger column
    /// is needed.
    pub async fn list_with_stock(
        pool: &PgPool,
        part_id: DbId,
    ) -> Result<Vec<MovementWithStock>, FlowError> {
        let part_query = format!("SELECT {PART_COLUMNS} FROM parts WHERE id = $1");
        let part = sqlx::query_as::<_, Part>(&part_query)
            .bind(part_id)
            .fetch_optional(pool)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Part",
                id: part_id,
            })?;

        let query = format!(
            "SELECT {COLUMNS} FROM stock_movements
             WHERE part_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        let movements = sqlx::query_as::<_, StockMovement>(&query)
            .bind(part_id)
            .fetch_all(pool)
            .await?;

        let pairs: Vec<(&str, i32)> = movements
            .iter()
            .map(|m| (m.movement_type.as_str(), m.quantity))
            .collect();
        let levels = inventory::stock_after_each(part.quantity_in_stock, &pairs);

        Ok(movements
            .into_iter()
            .zip(levels)
            .map(|(movement, stock_after)| MovementWithStock {
                movement,
                stock_after,
            })
            .collect())
    }

}
