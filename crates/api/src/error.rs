use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cmms_core::error::CoreError;
use cmms_db::FlowError;
use serde_json::json;

/// Error type returned by every handler.
///
/// Domain errors arrive as [`CoreError`], persistence errors as
/// [`sqlx::Error`]; both convert with `?`. Rendering happens in one place so
/// every failure becomes the same `{ "error", "code" }` JSON envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    /// The chat provider is unreachable, misconfigured, or returned garbage.
    #[error("Chat provider unavailable: {0}")]
    ChatUnavailable(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<FlowError> for AppError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::Domain(core) => AppError::Core(core),
            FlowError::Database(db) => AppError::Database(db),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => core_error_response(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::ChatUnavailable(msg) => {
                tracing::error!(error = %msg, "Chat provider error");
                (
                    StatusCode::BAD_GATEWAY,
                    "CHAT_UNAVAILABLE",
                    "The chat assistant is currently unavailable".to_string(),
                )
            }
        };

        let body = json!({ "error": message, "code": code });
        (status, axum::Json(body)).into_response()
    }
}

fn core_error_response(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::InvalidTransition { entity, from, to } => (
            StatusCode::CONFLICT,
            "INVALID_TRANSITION",
            format!("{entity} cannot move from '{from}' to '{to}'"),
        ),
        CoreError::InsufficientStock {
            part_id,
            available,
            requested,
        } => (
            StatusCode::CONFLICT,
            "INSUFFICIENT_STOCK",
            format!("Part {part_id} has {available} available, {requested} requested"),
        ),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Map a sqlx error to a response triple.
///
/// `RowNotFound` is 404. Unique violations on a `uq_` constraint and
/// foreign-key violations are both 409: the request was well-formed but lost
/// to existing data. Anything else is a sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if let sqlx::Error::RowNotFound = err {
        return (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        );
    }

    if let sqlx::Error::Database(db_err) = err {
        match db_err.code().as_deref() {
            Some("23505") => {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            Some("23503") => {
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    "Resource is still referenced by other records".to_string(),
                );
            }
            _ => {}
        }
    }

    tracing::error!(error = %err, "Database error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
