//! Handler for the chat assistant endpoint.

use axum::extract::State;
use axum::Json;

use crate::chat::{self, ChatRequest, ChatResponse};
use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/chat
pub async fn chat(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<DataResponse<ChatResponse>>> {
    let response = chat::run_chat(&state, &user, &request).await?;
    Ok(Json(DataResponse::new(response)))
}
