//! Route definitions for `/auth`.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login            -> login (public)
/// POST /refresh          -> refresh (public)
/// POST /logout           -> logout (requires auth)
/// POST /accept-invite    -> accept_invite (public, token-bearing)
/// POST /change-password  -> change_password (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/accept-invite", post(auth::accept_invite))
        .route("/change-password", post(auth::change_password))
}
