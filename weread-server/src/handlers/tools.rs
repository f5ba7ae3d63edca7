//! Named tool invocation handlers

use super::{json_body, ApiResult};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use weread_core::{tool_definitions, ToolDefinition};

#[derive(Debug, Serialize)]
pub struct ToolListResponse {
    pub tools: Vec<ToolDefinition>,
}

#[derive(Debug, Serialize)]
pub struct ToolCallResponse {
    pub result: Value,
}

/// List the tool catalog
pub async fn list_tools() -> Json<ToolListResponse> {
    Json(ToolListResponse {
        tools: tool_definitions(),
    })
}

/// Invoke one tool by name. An empty body means no arguments.
pub async fn call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> ApiResult<ToolCallResponse> {
    let args = json_body::<Value>(&body)?.unwrap_or(Value::Null);

    tracing::debug!(tool = %name, "invoking tool");
    let result = state.tools.call(&name, args).await?;
    Ok(Json(ToolCallResponse { result }))
}
