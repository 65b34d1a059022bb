//! `mcp_reference`: a Model Context Protocol (MCP) server core.
//!
//! Implements the MCP 2025-03-26 request surface as a transport-agnostic
//! JSON-RPC 2.0 dispatcher. Capabilities are registered once on a
//! [`Registry`], frozen, and served by a [`Server`] over any [`Transport`]:
//! line-delimited stdio ships with the crate, and [`http_router`] exposes the
//! same dispatcher as an axum router.
//!
//! # Quick start
//!
//! ```rust
//! use mcp_reference::{FnToolHandler, JsonRpcRequest, Registry, Server, Tool, text_result};
//! use serde_json::{Value, json};
//!
//! # async fn example() -> Result<(), mcp_reference::McpError> {
//! let registry = Registry::builder()
//!     .tool(
//!         Tool::new("echo", "Echoes text", json!({
//!             "type": "object",
//!             "properties": {"text": {"type": "string"}},
//!             "required": ["text"]
//!         })),
//!         FnToolHandler::new(|args: Value| async move {
//!             let text = args.get("text").and_then(Value::as_str).unwrap_or_default().to_string();
//!             Ok(text_result(text))
//!         }),
//!     )?
//!     .build();
//!
//! let server = Server::builder()
//!     .registry(registry)
//!     .server_info("my-server", "0.1.0")
//!     .build();
//!
//! let mut session = server.new_session();
//! let req = JsonRpcRequest::new(Some(json!(1)), "ping", None);
//! let resp = server.handle(&mut session, req).await;
//! assert!(resp.is_some());
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod loader;
pub mod logging;
pub mod method;
pub mod reference;
pub mod registry;
pub mod server;
pub mod session;
pub mod transport;
pub mod types;
mod validate;

// Re-export the most commonly used items at the crate root.
pub use config::{Config, TransportKind};
pub use loader::{load_prompts, load_resources, load_tools, parse_prompts, parse_resources, parse_tools};
pub use method::McpMethod;
pub use reference::reference_registry;
pub use registry::{
    FnPromptHandler, FnToolHandler, PromptHandler, Registry, RegistryBuilder, ResourceHandler,
    StaticResource, ToolHandler, TypedToolHandler,
};
pub use server::{Outcome, Server, ServerBuilder};
pub use session::{Session, SessionState};
pub use transport::{LineTransport, Transport, http_router, serve};
pub use types::{
    ContentBlock, JsonRpcRequest, JsonRpcResponse, McpError, PROTOCOL_VERSION, Prompt, PromptResult,
    Resource, ResourceContent, RpcError, Tool, ToolResult, error_result, text_result,
};
