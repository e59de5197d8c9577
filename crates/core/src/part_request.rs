//! Part-request urgency constants and approval state machine.
//!
//! A part request is an ad-hoc claim on spare-part stock outside work-order
//! planning. Approval places an explicit reservation on the part so two
//! approvals can never both pass against the same shrinking stock; delivery
//! consumes the reservation, rejection or cancellation releases it.

// ---------------------------------------------------------------------------
// Urgency
// ---------------------------------------------------------------------------

pub const URGENCY_LOW: &str = "low";
pub const URGENCY_NORMAL: &str = "normal";
pub const URGENCY_HIGH: &str = "high";
pub const URGENCY_CRITICAL: &str = "critical";

/// All valid urgency values.
pub const VALID_URGENCIES: &[&str] =
    &[URGENCY_LOW, URGENCY_NORMAL, URGENCY_HIGH, URGENCY_CRITICAL];

/// Validate an urgency string.
pub fn validate_urgency(urgency: &str) -> Result<(), String> {
    if VALID_URGENCIES.contains(&urgency) {
        Ok(())
    } else {
        Err(format!(
            "Invalid urgency '{urgency}'. Must be one of: {}",
            VALID_URGENCIES.join(", ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Status state machine
// ---------------------------------------------------------------------------

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";
pub const STATUS_DELIVERED: &str = "delivered";
pub const STATUS_CANCELLED: &str = "cancelled";

pub mod state_machine {
    use super::*;

    /// Returns the set of valid target statuses reachable from `from`.
    pub fn valid_transitions(from: &str) -> &'static [&'static str] {
        match from {
            STATUS_PENDING => &[STATUS_APPROVED, STATUS_REJECTED, STATUS_CANCELLED],
            STATUS_APPROVED => &[STATUS_DELIVERED, STATUS_CANCELLED],
            // Terminal states.
            STATUS_REJECTED | STATUS_DELIVERED | STATUS_CANCELLED => &[],
            _ => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: &str, to: &str) -> bool {
        valid_transitions(from).contains(&to)
    }
}
