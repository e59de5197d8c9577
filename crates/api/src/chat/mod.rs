//! Chat assistant backed by an OpenAI-compatible provider.
//!
//! The caller's message plus prior turns are forwarded with a role-scoped
//! system context and a tool table. Tools the caller's role does not allow
//! are simply not offered to the model. At most one round of tool calls is
//! executed before the final answer is returned; a model that keeps asking
//! for tools after that gets its last text content passed through as-is.

use cmms_core::roles::{ROLE_ADMIN, ROLE_MANAGER};
use cmms_db::models::work_order::CreateWorkOrder;
use cmms_db::repositories::{AssetRepo, DashboardRepo, WorkOrderRepo};
use cmms_db::tx::with_retry;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::ChatConfig;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const TOOL_CREATE_WORK_ORDER: &str = "create-work-order";
const TOOL_GET_ASSETS: &str = "get-assets";
const TOOL_GET_ANALYTICS: &str = "get-analytics";

/// Request body for `POST /chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Prior turns, oldest first.
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// One prior conversation turn supplied by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// `user` or `assistant`.
    pub role: String,
    pub content: String,
}

/// Response body for `POST /chat`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

// Wire types for the OpenAI-compatible chat completions API.

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    id: String,
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    /// JSON-encoded argument object.
    arguments: String,
}

/// Whether a role may use a given tool. Reads are open to everyone;
/// creating work orders and pulling analytics need manager or admin.
fn role_allows_tool(role: &str, tool: &str) -> bool {
    match tool {
        TOOL_GET_ASSETS => true,
        TOOL_CREATE_WORK_ORDER | TOOL_GET_ANALYTICS => {
            role == ROLE_MANAGER || role == ROLE_ADMIN
        }
        _ => false,
    }
}

/// Tool definitions offered to the model, filtered by the caller's role.
fn tool_table(role: &str) -> Vec<Value> {
    let mut tools = Vec::new();
    if role_allows_tool(role, TOOL_GET_ASSETS) {
        tools.push(json!({
            "type": "function",
            "function": {
                "name": TOOL_GET_ASSETS,
                "description": "List the assets under maintenance management.",
                "parameters": { "type": "object", "properties": {} }
            }
        }));
    }
    if role_allows_tool(role, TOOL_GET_ANALYTICS) {
        tools.push(json!({
            "type": "function",
            "function": {
                "name": TOOL_GET_ANALYTICS,
                "description": "Get the maintenance overview: work-order counts by status, open part requests, low-stock parts, active technicians, due schedules.",
                "parameters": { "type": "object", "properties": {} }
            }
        }));
    }
    if role_allows_tool(role, TOOL_CREATE_WORK_ORDER) {
        tools.push(json!({
            "type": "function",
            "function": {
                "name": TOOL_CREATE_WORK_ORDER,
                "description": "Create a maintenance work order on an asset.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "description": { "type": "string" },
                        "asset_id": { "type": "integer" },
                        "priority": {
                            "type": "string",
                            "enum": ["low", "medium", "high"]
                        }
                    },
                    "required": ["title", "asset_id"]
                }
            }
        }));
    }
    tools
}

/// System context for the model, scoped to the caller's role.
fn system_context(role: &str) -> String {
    format!(
        "You are the maintenance assistant of a CMMS. You help plan work \
         orders, track assets, and monitor spare-part stock. The current \
         user has the role '{role}'. Only act through the tools you are \
         given; if the user asks for something outside them, explain what \
         you can do instead. Answer concisely."
    )
}

/// Handle one chat request end to end.
pub async fn run_chat(
    state: &AppState,
    user: &AuthUser,
    request: &ChatRequest,
) -> AppResult<ChatResponse> {
    let config = state
        .config
        .chat
        .as_ref()
        .ok_or_else(|| AppError::ChatUnavailable("Chat assistant is not configured".into()))?;

    let mut messages = vec![json!({ "role": "system", "content": system_context(&user.role) })];
    for turn in &request.history {
        messages.push(json!({ "role": turn.role, "content": turn.content }));
    }
    messages.push(json!({ "role": "user", "content": request.message }));

    let tools = tool_table(&user.role);
    let first = complete(state, config, &messages, &tools).await?;

    if first.tool_calls.is_empty() {
        return Ok(ChatResponse {
            reply: first.content.unwrap_or_default(),
        });
    }

    // One round of tool execution, then a final completion with the results.
    let tool_call_echo: Vec<Value> = first
        .tool_calls
        .iter()
        .map(|call| {
            json!({
                "id": call.id,
                "type": "function",
                "function": { "name": call.function.name, "arguments": call.function.arguments }
            })
        })
        .collect();
    messages.push(json!({
        "role": "assistant",
        "content": first.content,
        "tool_calls": tool_call_echo
    }));

    for call in &first.tool_calls {
        let result = execute_tool(state, user, call).await;
        let payload = match result {
            Ok(value) => value,
            Err(err) => json!({ "error": err.to_string() }),
        };
        messages.push(json!({
            "role": "tool",
            "tool_call_id": call.id,
            "content": payload.to_string()
        }));
    }

    let second = complete(state, config, &messages, &[]).await?;
    Ok(ChatResponse {
        reply: second.content.unwrap_or_default(),
    })
}

/// Call the provider's chat completions endpoint once.
async fn complete(
    state: &AppState,
    config: &ChatConfig,
    messages: &[Value],
    tools: &[Value],
) -> AppResult<AssistantMessage> {
    let body = CompletionRequest {
        model: &config.model,
        messages: messages.to_vec(),
        tools: tools.to_vec(),
    };

    let response = state
        .http
        .post(format!("{}/chat/completions", config.base_url))
        .bearer_auth(&config.api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| AppError::ChatUnavailable(format!("Chat provider unreachable: {e}")))?;

    if !response.status().is_success() {
        let status = response.status();
        tracing::warn!(%status, "Chat provider returned an error");
        return Err(AppError::ChatUnavailable(format!(
            "Chat provider returned {status}"
        )));
    }

    let mut completion: CompletionResponse = response
        .json()
        .await
        .map_err(|e| AppError::ChatUnavailable(format!("Malformed provider response: {e}")))?;
    if completion.choices.is_empty() {
        return Err(AppError::ChatUnavailable(
            "Provider response contained no choices".into(),
        ));
    }
    Ok(completion.choices.remove(0).message)
}

/// Execute one tool call against the repositories.
///
/// The role gate is re-checked here: the model is only *offered* permitted
/// tools, but a hallucinated call must not bypass RBAC.
async fn execute_tool(state: &AppState, user: &AuthUser, call: &ToolCall) -> AppResult<Value> {
    let name = call.function.name.as_str();
    if !role_allows_tool(&user.role, name) {
        return Err(AppError::Core(cmms_core::error::CoreError::Forbidden(
            format!("Role '{}' may not use tool '{name}'", user.role),
        )));
    }

    match name {
        TOOL_GET_ASSETS => {
            let assets = AssetRepo::list(&state.pool).await?;
            Ok(serde_json::to_value(assets).map_err(|e| AppError::InternalError(e.to_string()))?)
        }
        TOOL_GET_ANALYTICS => {
            let overview = DashboardRepo::overview(&state.pool).await?;
            Ok(serde_json::to_value(overview)
                .map_err(|e| AppError::InternalError(e.to_string()))?)
        }
        TOOL_CREATE_WORK_ORDER => {
            let input: CreateWorkOrder = serde_json::from_str(&call.function.arguments)
                .map_err(|e| {
                    AppError::BadRequest(format!("Invalid create-work-order arguments: {e}"))
                })?;
            let order = with_retry(|| {
                WorkOrderRepo::create_with_parts(&state.pool, Some(user.user_id), &input)
            })
            .await?;
            Ok(serde_json::to_value(order).map_err(|e| AppError::InternalError(e.to_string()))?)
        }
        _ => Err(AppError::BadRequest(format!("Unknown tool: {name}"))),
    }
}
