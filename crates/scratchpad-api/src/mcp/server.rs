//! MCP server over HTTP POST.
//!
//! Each POST body carries one JSON-RPC message. Requests get a JSON-RPC
//! response; notifications get `202 Accepted` with no body.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use scratchpad_core::NoteService;

use super::handlers::ToolHandler;
use super::protocol::*;
use super::tools;
use crate::AppState;

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "scratchpad";

/// Stateless MCP message processor.
pub struct McpServer {
    tool_handler: ToolHandler,
}

impl McpServer {
    pub fn new(service: Arc<NoteService>) -> Self {
        Self {
            tool_handler: ToolHandler::new(service),
        }
    }

    /// Process one raw message. Returns `None` for notifications.
    pub async fn handle_message(&self, body: &[u8]) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_slice(body) {
            Ok(v) => v,
            Err(e) => {
                warn!(subsystem = "mcp", error = %e, "Failed to parse message");
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::parse_error(e.to_string()),
                ));
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::invalid_request(e.to_string()),
                ));
            }
        };

        let id = match request.id.clone() {
            Some(id) => id,
            None => {
                debug!(subsystem = "mcp", method = %request.method, "Notification");
                return None;
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request("jsonrpc must be \"2.0\""),
            ));
        }

        Some(self.handle_request(id, request).await)
    }

    async fn handle_request(&self, id: Value, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!(subsystem = "mcp", method = %request.method, "Request");

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            method => JsonRpcResponse::error(id, JsonRpcError::method_not_found(method)),
        }
    }

    fn handle_initialize(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: InitializeParams = match params
            .map(serde_json::from_value::<InitializeParams>)
            .transpose()
        {
            Ok(Some(p)) => p,
            Ok(None) => {
                return JsonRpcResponse::error(id, JsonRpcError::invalid_params("missing params"))
            }
            Err(e) => return JsonRpcResponse::error(id, JsonRpcError::invalid_params(e.to_string())),
        };

        let client = params
            .client_info
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("unknown");
        info!(
            subsystem = "mcp",
            client,
            protocol_version = %params.protocol_version,
            "Client initialized"
        );

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        match serde_json::to_value(result) {
            Ok(v) => JsonRpcResponse::success(id, v),
            Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
        }
    }

    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        let result = ToolsListResult {
            tools: tools::all_tools(),
        };
        match serde_json::to_value(result) {
            Ok(v) => JsonRpcResponse::success(id, v),
            Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
        }
    }

    async fn handle_tools_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params
            .map(serde_json::from_value::<ToolCallParams>)
            .transpose()
        {
            Ok(Some(p)) => p,
            Ok(None) => {
                return JsonRpcResponse::error(id, JsonRpcError::invalid_params("missing params"))
            }
            Err(e) => return JsonRpcResponse::error(id, JsonRpcError::invalid_params(e.to_string())),
        };

        // Tool failures are reported inside the result so the model can read them.
        let result = match self.tool_handler.handle(&params.name, params.arguments).await {
            Ok(value) => match serde_json::to_string_pretty(&value) {
                Ok(text) => ToolCallResult::success(text),
                Err(e) => ToolCallResult::error(format!("failed to encode result: {}", e)),
            },
            Err(e) => {
                let message = format!("{:#}", e);
                warn!(subsystem = "mcp", tool = %params.name, error = %message, "Tool failed");
                ToolCallResult::error(message)
            }
        };

        match serde_json::to_value(result) {
            Ok(v) => JsonRpcResponse::success(id, v),
            Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
        }
    }
}

/// POST /mcp
pub async fn handle_mcp(State(state): State<AppState>, body: Bytes) -> Response {
    let server = McpServer::new(state.service.clone());
    match server.handle_message(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scratchpad_db::MemoryNoteStore;

    fn server() -> McpServer {
        let store = Arc::new(MemoryNoteStore::new());
        McpServer::new(Arc::new(NoteService::new(store)))
    }

    async fn call(server: &McpServer, msg: Value) -> JsonRpcResponse {
        server
            .handle_message(msg.to_string().as_bytes())
            .await
            .expect("expected a response")
    }

    #[tokio::test]
    async fn test_parse_error() {
        let resp = server().handle_message(b"{not json").await.unwrap();
        assert_eq!(resp.error.unwrap().code, -32700);
        assert_eq!(resp.id, Value::Null);
    }

    #[tokio::test]
    async fn test_notification_has_no_response() {
        let msg = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
        assert!(server()
            .handle_message(msg.to_string().as_bytes())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_initialize() {
        let resp = call(
            &server(),
            json!({
                "jsonrpc": "2.0", "id": 1, "method": "initialize",
                "params": {"protocolVersion": "2024-11-05", "capabilities": {},
                           "clientInfo": {"name": "test", "version": "0.1"}}
            }),
        )
        .await;
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn test_initialize_without_params() {
        let resp = call(&server(), json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"})).await;
        assert_eq!(resp.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let resp = call(&server(), json!({"jsonrpc": "2.0", "id": "a", "method": "resources/list"})).await;
        assert_eq!(resp.id, json!("a"));
        assert_eq!(resp.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_tools_list() {
        let resp = call(&server(), json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})).await;
        let tools = resp.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 6);
        assert!(tools.iter().any(|t| t["name"] == "search_notes"));
        assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
    }

    #[tokio::test]
    async fn test_tool_error_sets_is_error() {
        let resp = call(
            &server(),
            json!({
                "jsonrpc": "2.0", "id": 3, "method": "tools/call",
                "params": {"name": "get_recent_notes", "arguments": {"since": "someday"}}
            }),
        )
        .await;
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("invalid 'since' date format"));
    }

    #[tokio::test]
    async fn test_tool_success_is_pretty_json_text() {
        let resp = call(
            &server(),
            json!({
                "jsonrpc": "2.0", "id": 4, "method": "tools/call",
                "params": {"name": "list_categories"}
            }),
        )
        .await;
        let result = resp.result.unwrap();
        assert!(result.get("isError").is_none());
        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(result["content"][0]["text"], "[]");
    }
}
