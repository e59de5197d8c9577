//! Route definition for the chat assistant.

use axum::routing::post;
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// Routes mounted at `/chat`.
///
/// ```text
/// POST / -> chat
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(chat::chat))
}
