//! Work-order status constants and state machine.
//!
//! This module lives in `core` (zero internal deps) so the same transition
//! rules are enforced by the transactional flows in `db` and surfaced by the
//! API layer.

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";

/// All valid work-order statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_IN_PROGRESS,
    STATUS_COMPLETED,
    STATUS_CANCELLED,
];

// ---------------------------------------------------------------------------
// Priority / type constants
// ---------------------------------------------------------------------------

pub const PRIORITY_LOW: &str = "low";
pub const PRIORITY_MEDIUM: &str = "medium";
pub const PRIORITY_HIGH: &str = "high";

pub const VALID_PRIORITIES: &[&str] = &[PRIORITY_LOW, PRIORITY_MEDIUM, PRIORITY_HIGH];

pub const TYPE_CORRECTIVE: &str = "corrective";
pub const TYPE_PREVENTIVE: &str = "preventive";
pub const TYPE_PREDICTIVE: &str = "predictive";

pub const VALID_TYPES: &[&str] = &[TYPE_CORRECTIVE, TYPE_PREVENTIVE, TYPE_PREDICTIVE];

/// Validate a priority string.
pub fn validate_priority(priority: &str) -> Result<(), String> {
    if VALID_PRIORITIES.contains(&priority) {
        Ok(())
    } else {
        Err(format!(
            "Invalid priority '{priority}'. Must be one of: {}",
            VALID_PRIORITIES.join(", ")
        ))
    }
}

/// Validate a work-order type string.
pub fn validate_order_type(order_type: &str) -> Result<(), String> {
    if VALID_TYPES.contains(&order_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid work order type '{order_type}'. Must be one of: {}",
            VALID_TYPES.join(", ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Part line statuses
// ---------------------------------------------------------------------------

pub const LINE_PLANNED: &str = "planned";
pub const LINE_RESERVED: &str = "reserved";
pub const LINE_CONSUMED: &str = "consumed";
pub const LINE_CANCELLED: &str = "cancelled";

/// Line statuses that participate in completion/cancellation. Lines already
/// consumed or cancelled are never touched again.
pub const OPEN_LINE_STATUSES: &[&str] = &[LINE_PLANNED, LINE_RESERVED];

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

pub mod state_machine {
    use super::*;

    /// Returns the set of valid target statuses reachable from `from`.
    ///
    /// Terminal states (`completed`, `cancelled`) return an empty slice
    /// because no further transitions are allowed.
    pub fn valid_transitions(from: &str) -> &'static [&'static str] {
        match from {
            STATUS_PENDING => &[STATUS_IN_PROGRESS, STATUS_CANCELLED, STATUS_COMPLETED],
            STATUS_IN_PROGRESS => &[STATUS_COMPLETED, STATUS_CANCELLED],
            // Terminal states.
            STATUS_COMPLETED | STATUS_CANCELLED => &[],
            // Unknown status: no transitions allowed.
            _ => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: &str, to: &str) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Whether a work order in `status` may still be edited or cancelled.
    pub fn is_terminal(status: &str) -> bool {
        matches!(status, STATUS_COMPLETED | STATUS_CANCELLED)
    }
}
