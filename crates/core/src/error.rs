use crate::types::DbId;

/// Closed error taxonomy for domain failures.
///
/// Callers branch on the variant, never on message text. The API layer maps
/// each variant to an HTTP status and a stable error code.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid transition for {entity}: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("Insufficient stock for part {part_id}: available {available}, requested {requested}")]
    InsufficientStock {
        part_id: DbId,
        available: i32,
        requested: i32,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
