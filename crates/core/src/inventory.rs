//! Stock movement arithmetic and history reconstruction.
//!
//! Stock levels are maintained redundantly on the part row; movements are the
//! append-only audit log. These pure functions keep both views consistent and
//! are enforced inside the DB transactions that mutate stock.

pub const MOVEMENT_IN: &str = "in";
pub const MOVEMENT_OUT: &str = "out";

/// All valid movement types.
pub const VALID_MOVEMENT_TYPES: &[&str] = &[MOVEMENT_IN, MOVEMENT_OUT];

/// Default minimum stock level for new parts.
pub const DEFAULT_MIN_STOCK_LEVEL: i32 = 5;

/// Validate a movement type string.
pub fn validate_movement_type(movement_type: &str) -> Result<(), String> {
    if VALID_MOVEMENT_TYPES.contains(&movement_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid movement type '{movement_type}'. Must be one of: {}",
            VALID_MOVEMENT_TYPES.join(", ")
        ))
    }
}

/// Signed quantity of a movement: +quantity for `in`, -quantity for `out`.
///
/// `quantity` is expected to be positive (validated upstream).
pub fn signed_quantity(movement_type: &str, quantity: i32) -> i32 {
    match movement_type {
        MOVEMENT_OUT => -quantity,
        _ => quantity,
    }
}

/// Apply a movement to a stock level, rejecting any result below zero.
///
/// Returns the new stock level, or `Err((available, requested))` when an
/// outbound movement would cross zero.
pub fn apply_movement(
    stock: i32,
    movement_type: &str,
    quantity: i32,
) -> Result<i32, (i32, i32)> {
    let new_stock = stock + signed_quantity(movement_type, quantity);
    if new_stock < 0 {
        return Err((stock, quantity));
    }
    Ok(new_stock)
}

/// Quantity actually available for new reservations or plans.
pub fn available(stock: i32, reserved: i32) -> i32 {
    stock - reserved
}

/// Whether available stock covers a requested quantity.
pub fn can_fulfill(stock: i32, reserved: i32, requested: i32) -> bool {
    available(stock, reserved) >= requested
}

/// Whether the part is at or below its reorder threshold.
pub fn is_low_stock(stock: i32, min_stock_level: i32) -> bool {
    stock <= min_stock_level
}

/// Whether any stock is on hand at all.
pub fn has_stock(stock: i32) -> bool {
    stock > 0
}

/// Back-compute the stock level immediately after each movement.
///
/// `movements` must be sorted ascending by time and carry `(movement_type,
/// quantity)` pairs. Starting from `current_stock` (the level after the last
/// movement), the list is walked in reverse chronological order, undoing each
/// movement's signed effect to find the balance after the previous one. The
/// result is aligned with the input: `result[i]` is the stock level right
/// after `movements[i]` landed.
pub fn stock_after_each(current_stock: i32, movements: &[(&str, i32)]) -> Vec<i32> {
    let mut result = vec![0; movements.len()];
    let mut running = current_stock;
    for (i, (movement_type, quantity)) in movements.iter().enumerate().rev() {
        result[i] = running;
        running -= signed_quantity(movement_type, *quantity);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_quantity_in_positive_out_negative() {
        assert_eq!(signed_quantity(MOVEMENT_IN, 10), 10);
        assert_eq!(signed_quantity(MOVEMENT_OUT, 10), -10);
    }

    #[test]
    fn apply_in_increases_stock() {
        assert_eq!(apply_movement(0, MOVEMENT_IN, 10), Ok(10));
    }

    #[test]
    fn apply_out_decreases_stock() {
        assert_eq!(apply_movement(10, MOVEMENT_OUT, 3), Ok(7));
    }

    #[test]
    fn out_below_zero_rejected_with_shortfall() {
        assert_eq!(apply_movement(2, MOVEMENT_OUT, 5), Err((2, 5)));
    }

    #[test]
    fn out_to_exactly_zero_allowed() {
        assert_eq!(apply_movement(5, MOVEMENT_OUT, 5), Ok(0));
    }

    #[test]
    fn stock_is_initial_plus_signed_sum() {
        let movements = [
            (MOVEMENT_IN, 10),
            (MOVEMENT_OUT, 3),
            (MOVEMENT_IN, 5),
            (MOVEMENT_OUT, 2),
        ];
        let mut stock = 0;
        for (t, q) in movements {
            stock = apply_movement(stock, t, q).unwrap();
        }
        assert_eq!(stock, 10 - 3 + 5 - 2);
    }

    #[test]
    fn reservation_reduces_availability() {
        assert!(can_fulfill(10, 0, 10));
        assert!(!can_fulfill(10, 4, 7));
        assert!(can_fulfill(10, 4, 6));
    }

    #[test]
    fn low_stock_at_threshold() {
        assert!(is_low_stock(5, 5));
        assert!(!is_low_stock(6, 5));
    }

    #[test]
    fn stock_after_each_reverse_walk() {
        // 0 ->(+10) 10 ->(-3) 7 ->(+5) 12 ->(-2) 10
        let movements = [
            (MOVEMENT_IN, 10),
            (MOVEMENT_OUT, 3),
            (MOVEMENT_IN, 5),
            (MOVEMENT_OUT, 2),
        ];
        assert_eq!(stock_after_each(10, &movements), vec![10, 7, 12, 10]);
    }

    #[test]
    fn stock_after_each_empty() {
        assert!(stock_after_each(4, &[]).is_empty());
    }

    #[test]
    fn stock_after_each_single_movement() {
        assert_eq!(stock_after_each(10, &[(MOVEMENT_IN, 10)]), vec![10]);
    }
}
