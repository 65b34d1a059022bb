use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 error codes.
pub const ERR_CODE_PARSE: i32 = -32700;
pub const ERR_CODE_INVALID_REQ: i32 = -32600;
pub const ERR_CODE_NO_METHOD: i32 = -32601;
pub const ERR_CODE_BAD_PARAMS: i32 = -32602;
pub const ERR_CODE_INTERNAL: i32 = -32603;

/// JSON-RPC envelope version.
pub const JSONRPC_VERSION: &str = "2.0";

/// Latest MCP protocol version this server knows about.
pub const PROTOCOL_VERSION: &str = "2025-03-26";

// ── Request ──

/// Inbound JSON-RPC 2.0 request. An absent (or null) `id` marks a notification.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Convenience constructor, mostly for tests and in-process callers.
    pub fn new(id: Option<Value>, method: impl Into<String>, params: Option<Value>) -> Self {
        JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION.into(),
            id,
            method: method.into(),
            params,
        }
    }

    /// True when no response is expected.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// True for the methods that end a message loop (`exit`, `notifications/cancelled`).
    pub fn is_shutdown(&self) -> bool {
        matches!(self.method.as_str(), "exit" | "notifications/cancelled")
    }
}

// ── Response ──

/// Outbound JSON-RPC 2.0 response.
///
/// The payload is either a result or an error, never both; the `id` is the
/// one carried by the triggering request (`null` for undecodable input).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(flatten)]
    pub payload: ResponsePayload,
    pub id: Value,
}

/// The mutually exclusive halves of a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponsePayload {
    Result(Value),
    Error(RpcError),
}

impl JsonRpcResponse {
    /// Build a success response.
    pub fn ok(id: Value, result: Value) -> Self {
        JsonRpcResponse {
            jsonrpc: JSONRPC_VERSION.into(),
            payload: ResponsePayload::Result(result),
            id,
        }
    }

    /// Build an error response.
    pub fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
        JsonRpcResponse {
            jsonrpc: JSONRPC_VERSION.into(),
            payload: ResponsePayload::Error(RpcError {
                code,
                message: message.into(),
                data: None,
            }),
            id,
        }
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.payload {
            ResponsePayload::Result(v) => Some(v),
            ResponsePayload::Error(_) => None,
        }
    }

    pub fn rpc_error(&self) -> Option<&RpcError> {
        match &self.payload {
            ResponsePayload::Result(_) => None,
            ResponsePayload::Error(e) => Some(e),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.payload, ResponsePayload::Error(_))
    }
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

// ── MCP domain types ──

/// Tool descriptor. `name` is the registry key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    /// Parsed schema metadata for validation (not serialized to clients).
    #[serde(skip)]
    pub schema_meta: SchemaMeta,
}

impl Tool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        let schema_meta = SchemaMeta::from_schema(&input_schema);
        Tool {
            name: name.into(),
            description: description.into(),
            input_schema,
            schema_meta,
        }
    }
}

/// Prompt descriptor. `name` is the registry key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub arguments: Vec<PromptArgument>,
}

/// One declared prompt argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptArgument {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

/// Resource descriptor. `uri` is the registry key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

/// Single content block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn as_text(&self) -> &str {
        match self {
            ContentBlock::Text { text } => text,
        }
    }
}

/// Tool call result returned by handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub is_error: bool,
}

/// Who a prompt message speaks as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: ContentBlock,
}

/// Result of `prompts/get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptResult {
    pub description: String,
    pub messages: Vec<PromptMessage>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

/// Resource content returned by resource handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContent {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

/// Result of `resources/read`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadResourceResult {
    pub contents: Vec<ResourceContent>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

/// Parsed schema metadata used for argument validation.
#[derive(Debug, Clone, Default)]
pub struct SchemaMeta {
    pub required: Vec<String>,
    /// Declared JSON type of each property that names one.
    pub property_types: HashMap<String, String>,
}

// ── Handshake ──

/// `initialize` params. `protocolVersion` is mandatory.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    #[serde(default)]
    pub capabilities: Value,
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Static server identity reported by `initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Fixed capability flags; this server advertises everything it routes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub logging: bool,
    pub prompts: bool,
    pub resources: bool,
    pub tools: bool,
}

impl ServerCapabilities {
    pub fn all() -> Self {
        ServerCapabilities {
            logging: true,
            prompts: true,
            resources: true,
            tools: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

// ── Per-method params ──

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Prompt arguments are string-valued by protocol.
pub type PromptArguments = HashMap<String, String>;

#[derive(Debug, Clone, Deserialize)]
pub struct PromptGetParams {
    pub name: String,
    #[serde(default)]
    pub arguments: PromptArguments,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceReadParams {
    pub uri: String,
}

// ── Convenience constructors ──

/// Create a simple text tool result.
pub fn text_result(text: impl Into<String>) -> ToolResult {
    ToolResult {
        content: vec![ContentBlock::text(text)],
        is_error: false,
    }
}

/// Create an error tool result.
pub fn error_result(text: impl Into<String>) -> ToolResult {
    ToolResult {
        content: vec![ContentBlock::text(text)],
        is_error: true,
    }
}

/// MCP error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Method not found: {0}")]
    MethodNotFound(String),
    /// User-facing handler failure, reported as an `isError` payload.
    #[error("{0}")]
    Tool(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("duplicate {namespace} registration: {key}")]
    DuplicateRegistration { namespace: &'static str, key: String },
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

impl McpError {
    /// JSON-RPC error code this error is reported with.
    pub fn code(&self) -> i32 {
        match self {
            McpError::Validation(_) | McpError::InvalidParams(_) => ERR_CODE_BAD_PARAMS,
            McpError::InvalidRequest(_) => ERR_CODE_INVALID_REQ,
            McpError::MethodNotFound(_) => ERR_CODE_NO_METHOD,
            _ => ERR_CODE_INTERNAL,
        }
    }
}
