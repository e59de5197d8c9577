//! Flow error type and transient-error retry helper.
//!
//! Every multi-row mutation in this crate runs inside a single transaction
//! owned by the flow method itself. [`with_retry`] re-invokes a whole flow
//! when Postgres reports a serialization failure or deadlock, so concurrent
//! stock mutations resolve by re-running rather than surfacing a 500.

use std::future::Future;
use std::time::Duration;

use cmms_core::error::CoreError;

/// Maximum attempts for a retried flow (1 initial + 2 retries).
const MAX_ATTEMPTS: u32 = 3;

/// Base backoff delay; attempt `n` waits `100ms * 2^(n-1)`.
const BASE_BACKOFF: Duration = Duration::from_millis(100);

/// Error type returned by transactional flows.
///
/// Domain violations (invalid transition, insufficient stock, missing rows)
/// are [`CoreError`]; everything else is the underlying sqlx error.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Whether an error is worth retrying: Postgres serialization failure
/// (SQLSTATE 40001), deadlock (40P01), or a pool acquire timeout.
fn is_transient(err: &FlowError) -> bool {
    match err {
        FlowError::Database(sqlx::Error::PoolTimedOut) => true,
        FlowError::Database(sqlx::Error::Database(db_err)) => {
            matches!(db_err.code().as_deref(), Some("40001") | Some("40P01"))
        }
        _ => false,
    }
}

/// Run a flow, retrying transient database errors with exponential backoff.
///
/// The closure is re-invoked from scratch on each attempt, so the whole
/// transaction (including its reads) is replayed. Non-transient errors and
/// exhausted retries propagate immediately.
pub async fn with_retry<T, F, Fut>(mut flow: F) -> Result<T, FlowError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FlowError>>,
{
    let mut attempt = 1u32;
    loop {
        match flow().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < MAX_ATTEMPTS && is_transient(&err) => {
                let delay = BASE_BACKOFF * 2u32.pow(attempt - 1);
                tracing::warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient database error, retrying flow"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
