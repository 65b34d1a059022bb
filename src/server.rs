use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};

use crate::codec;
use crate::config::{DEFAULT_SERVER_NAME, DEFAULT_SERVER_VERSION};
use crate::method::McpMethod;
use crate::registry::Registry;
use crate::session::Session;
use crate::types::*;

/// What a transport should do with one inbound frame.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Send these bytes back (no trailing newline; framing is the transport's job).
    Reply(Vec<u8>),
    /// Nothing to send: the frame was a notification.
    Silent,
    /// `exit` or `notifications/cancelled`: stop the message loop.
    Shutdown,
}

/// The MCP dispatcher. Create with `ServerBuilder`, then hand to a transport.
pub struct Server {
    pub(crate) info: ServerInfo,
    pub(crate) registry: Arc<Registry>,
    pub(crate) strict_handshake: bool,
}

impl Server {
    /// Create a new server builder.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn server_info(&self) -> &ServerInfo {
        &self.info
    }

    /// Fresh session for a newly opened connection.
    pub fn new_session(&self) -> Session {
        Session::new()
    }

    /// Decode one frame, dispatch it, and encode the reply.
    pub async fn handle_message(&self, session: &mut Session, frame: &[u8]) -> Outcome {
        let req = match codec::decode(frame) {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!(error = %e, "undecodable message");
                return Outcome::Reply(codec::encode(&e.to_response()));
            }
        };

        if req.is_shutdown() {
            tracing::info!(method = %req.method, "shutdown requested");
            return Outcome::Shutdown;
        }

        match self.handle(session, req).await {
            Some(resp) => Outcome::Reply(codec::encode(&resp)),
            None => Outcome::Silent,
        }
    }

    /// Route a JSON-RPC request to the appropriate MCP handler.
    ///
    /// Returns `None` for notifications, including failed ones.
    pub async fn handle(&self, session: &mut Session, req: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let JsonRpcRequest { id, method, params, .. } = req;
        tracing::debug!(method = %method, id = ?id, "request");

        let outcome = self.dispatch(session, &method, params).await;

        let Some(id) = id else {
            if let Err(e) = outcome {
                tracing::debug!(method = %method, error = %e, "notification failed");
            }
            return None;
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::ok(id, result),
            Err(e) => {
                tracing::warn!(method = %method, code = e.code(), error = %e, "request failed");
                JsonRpcResponse::error(id, e.code(), e.to_string())
            }
        })
    }

    async fn dispatch(
        &self,
        session: &mut Session,
        method: &str,
        params: Option<Value>,
    ) -> Result<Value, McpError> {
        let call = McpMethod::decode(method, params)?;

        if self.strict_handshake && !session.is_initialized() && call.requires_session() {
            return Err(McpError::InvalidRequest(format!(
                "session not initialized; send initialize before {}",
                method
            )));
        }

        match call {
            McpMethod::Initialize(p) => self.handle_initialize(session, p),
            McpMethod::Initialized | McpMethod::Ping | McpMethod::Exit | McpMethod::Cancelled => {
                Ok(json!({}))
            }
            McpMethod::ToolsList => Ok(json!({ "tools": self.registry.list_tools() })),
            McpMethod::ToolsCall(p) => self.handle_tools_call(p).await,
            McpMethod::PromptsList => Ok(json!({ "prompts": self.registry.list_prompts() })),
            McpMethod::PromptsGet(p) => self.handle_prompts_get(p).await,
            McpMethod::ResourcesList => Ok(json!({ "resources": self.registry.list_resources() })),
            McpMethod::ResourcesRead(p) => self.handle_resources_read(p).await,
        }
    }

    fn handle_initialize(&self, session: &mut Session, params: InitializeParams) -> Result<Value, McpError> {
        let client_name = params.client_info.as_ref().map_or("", |c| c.name.as_str());
        let client_version = params.client_info.as_ref().map_or("", |c| c.version.as_str());
        tracing::info!(
            client_name,
            client_version,
            protocol_version = %params.protocol_version,
            "initialize"
        );
        if params.protocol_version != PROTOCOL_VERSION {
            tracing::debug!(
                requested = %params.protocol_version,
                latest = PROTOCOL_VERSION,
                "client requested a different protocol version; echoing it"
            );
        }

        let protocol_version = session.negotiate(params).to_string();
        to_value(InitializeResult {
            protocol_version,
            capabilities: ServerCapabilities::all(),
            server_info: self.info.clone(),
        })
    }

    async fn handle_tools_call(&self, params: ToolCallParams) -> Result<Value, McpError> {
        let Some(entry) = self.registry.find_tool(&params.name) else {
            tracing::info!(tool = %params.name, "unknown tool");
            return to_value(error_result(format!("Error: unknown tool '{}'", params.name)));
        };

        let args = if params.arguments.is_null() {
            json!({})
        } else {
            params.arguments
        };

        // Validate arguments.
        entry.tool.validate_arguments(&args)?;

        let handler = Arc::clone(&entry.handler);
        let result = match guarded(&params.name, async move { handler.call(args).await }).await {
            Ok(r) => r,
            Err(McpError::Tool(msg)) => error_result(msg),
            Err(e) => return Err(e),
        };

        to_value(result)
    }

    async fn handle_prompts_get(&self, params: PromptGetParams) -> Result<Value, McpError> {
        let Some(entry) = self.registry.find_prompt(&params.name) else {
            tracing::info!(prompt = %params.name, "unknown prompt");
            return to_value(prompt_error(
                "Unknown prompt",
                format!("Error: unknown prompt '{}'", params.name),
            ));
        };

        entry.prompt.validate_arguments(&params.arguments)?;

        let handler = Arc::clone(&entry.handler);
        let args = params.arguments;
        let result = match guarded(&params.name, async move { handler.call(&args).await }).await {
            Ok(r) => r,
            Err(McpError::Tool(msg)) => prompt_error("Prompt failed", format!("Error: {}", msg)),
            Err(e) => return Err(e),
        };

        to_value(result)
    }

    async fn handle_resources_read(&self, params: ResourceReadParams) -> Result<Value, McpError> {
        let uri = params.uri;
        let Some(entry) = self.registry.find_resource(&uri) else {
            tracing::info!(uri = %uri, "unknown resource");
            return to_value(resource_error(uri, "Error: resource not found"));
        };

        let handler = Arc::clone(&entry.handler);
        let target = uri.clone();
        let content = match guarded(&uri, async move { handler.call(&target).await }).await {
            Ok(c) => c,
            Err(McpError::Tool(msg)) => {
                return to_value(resource_error(uri, format!("Error: {}", msg)));
            }
            Err(e) => return Err(e),
        };

        to_value(ReadResourceResult {
            contents: vec![content],
            is_error: false,
        })
    }
}

/// Run a handler on its own task so a panic can't unwind through the loop.
///
/// `Tool`, `InvalidParams`, `Validation` and `Internal` pass through; any
/// other error collapses into `Internal`.
async fn guarded<T, F>(label: &str, fut: F) -> Result<T, McpError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, McpError>> + Send + 'static,
{
    match tokio::spawn(fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e @ (McpError::Tool(_) | McpError::InvalidParams(_) | McpError::Validation(_)))) => {
            Err(e)
        }
        Ok(Err(e @ McpError::Internal(_))) => {
            tracing::error!(handler = label, error = %e, "handler failed");
            Err(e)
        }
        Ok(Err(e)) => {
            tracing::error!(handler = label, error = %e, "handler failed");
            Err(McpError::Internal(e.to_string()))
        }
        Err(join) if join.is_panic() => {
            tracing::error!(handler = label, "handler panicked");
            Err(McpError::Internal(format!("handler '{}' panicked", label)))
        }
        Err(join) => Err(McpError::Internal(join.to_string())),
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value, McpError> {
    Ok(serde_json::to_value(value)?)
}

fn prompt_error(description: &str, text: String) -> PromptResult {
    PromptResult {
        description: description.into(),
        messages: vec![PromptMessage {
            role: Role::Assistant,
            content: ContentBlock::text(text),
        }],
        is_error: true,
    }
}

fn resource_error(uri: String, text: impl Into<String>) -> ReadResourceResult {
    ReadResourceResult {
        contents: vec![ResourceContent {
            uri,
            mime_type: "text/plain".into(),
            text: text.into(),
        }],
        is_error: true,
    }
}

/// Builder for constructing an MCP Server.
#[derive(Default)]
pub struct ServerBuilder {
    registry: Option<Registry>,
    server_name: Option<String>,
    server_version: Option<String>,
    strict_handshake: bool,
}

impl ServerBuilder {
    /// Use a frozen capability registry.
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set server name and version.
    pub fn server_info(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.server_name = Some(name.into());
        self.server_version = Some(version.into());
        self
    }

    /// Reject non-initialize calls on a fresh session with `InvalidRequest`.
    pub fn strict_handshake(mut self, strict: bool) -> Self {
        self.strict_handshake = strict;
        self
    }

    /// Build the server.
    pub fn build(self) -> Server {
        Server {
            info: ServerInfo {
                name: self.server_name.unwrap_or_else(|| DEFAULT_SERVER_NAME.into()),
                version: self.server_version.unwrap_or_else(|| DEFAULT_SERVER_VERSION.into()),
            },
            registry: Arc::new(self.registry.unwrap_or_default()),
            strict_handshake: self.strict_handshake,
        }
    }
}
