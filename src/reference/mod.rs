//! The reference capability set served by the binary.
//!
//! Descriptors live in `catalog/*.json` and are embedded at build time;
//! this module binds each descriptor to its handler.

pub mod quotes;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;

use crate::loader;
use crate::registry::{
    FnPromptHandler, PromptHandler, Registry, StaticResource, ToolHandler, TypedToolHandler,
};
use crate::types::*;

use quotes::QuoteBook;

const TOOLS_JSON: &[u8] = include_bytes!("../../catalog/tools.json");
const PROMPTS_JSON: &[u8] = include_bytes!("../../catalog/prompts.json");
const RESOURCES_JSON: &[u8] = include_bytes!("../../catalog/resources.json");

const README_TEXT: &str = "# MCP Reference Server\n\nThis is a reference implementation of an MCP server: \
a JSON-RPC dispatcher with echo, add and quotify tools, a greeting prompt, and two static resources.";
const CONFIG_TEXT: &str = r#"{"name": "mcp-server", "version": "1.0.0", "debug": true}"#;

/// Build the frozen reference registry. `quote_seed` makes `quotify` reproducible.
pub fn reference_registry(quote_seed: Option<u64>) -> Result<Registry, McpError> {
    let mut builder = Registry::builder();

    for tool in loader::parse_tools(TOOLS_JSON)? {
        let handler = tool_handler(&tool.name, quote_seed)?;
        builder = builder.tool(tool, handler)?;
    }

    for prompt in loader::parse_prompts(PROMPTS_JSON)? {
        let handler = match prompt.name.as_str() {
            "greeting" => greeting_prompt(),
            other => return Err(McpError::Config(format!("no handler for prompt '{}'", other))),
        };
        builder = builder.prompt(prompt, handler)?;
    }

    for resource in loader::parse_resources(RESOURCES_JSON)? {
        let text = match resource.uri.as_str() {
            "file://README.md" => README_TEXT,
            "file://config.json" => CONFIG_TEXT,
            other => return Err(McpError::Config(format!("no content for resource '{}'", other))),
        };
        let handler = StaticResource::new(resource.mime_type.clone(), text);
        builder = builder.resource(resource, handler)?;
    }

    Ok(builder.build())
}

fn tool_handler(name: &str, quote_seed: Option<u64>) -> Result<Arc<dyn ToolHandler>, McpError> {
    let handler: Arc<dyn ToolHandler> = match name {
        "echo" => TypedToolHandler::new(|args: EchoArgs| async move {
            Ok(text_result(format!("Echo: {}", args.text)))
        }),
        "add" => TypedToolHandler::new(|args: AddArgs| async move {
            let sum = args.a + args.b;
            Ok(text_result(format!("Result: {} + {} = {}", args.a, args.b, sum)))
        }),
        "quotify" => Arc::new(QuotifyHandler::new(QuoteBook::classic(), quote_seed)),
        other => return Err(McpError::Config(format!("no handler for tool '{}'", other))),
    };
    Ok(handler)
}

#[derive(Debug, Deserialize)]
struct EchoArgs {
    text: String,
}

#[derive(Debug, Deserialize)]
struct AddArgs {
    a: f64,
    b: f64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum QuoteFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Default, Deserialize)]
struct QuotifyArgs {
    #[serde(default)]
    format: QuoteFormat,
}

/// `quotify`: a random quote with a random author.
struct QuotifyHandler {
    book: QuoteBook,
    rng: Mutex<StdRng>,
}

impl QuotifyHandler {
    fn new(book: QuoteBook, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        QuotifyHandler {
            book,
            rng: Mutex::new(rng),
        }
    }
}

#[async_trait]
impl ToolHandler for QuotifyHandler {
    async fn call(&self, args: serde_json::Value) -> Result<ToolResult, McpError> {
        let args: QuotifyArgs =
            serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;
        tracing::debug!(format = ?args.format, "quotify");

        let quote = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| McpError::Internal("quote rng poisoned".into()))?;
            self.book.pick(&mut *rng)
        };

        let text = match args.format {
            QuoteFormat::Text => self.book.render(&quote),
            QuoteFormat::Json => serde_json::to_string_pretty(&quote)?,
        };
        Ok(text_result(text))
    }
}

fn greeting_prompt() -> Arc<dyn PromptHandler> {
    FnPromptHandler::new(|args: &PromptArguments| {
        let name = args.get("name").map_or("World", String::as_str);
        Ok(PromptResult {
            description: "A friendly greeting message".into(),
            messages: vec![PromptMessage {
                role: Role::User,
                content: ContentBlock::text(format!("Hello, {}! How are you doing today?", name)),
            }],
            is_error: false,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::Server;
    use serde_json::{Value, json};

    fn server(seed: u64) -> Server {
        Server::builder()
            .registry(reference_registry(Some(seed)).unwrap())
            .build()
    }

    async fn call(srv: &Server, method: &str, params: Value) -> JsonRpcResponse {
        let mut session = srv.new_session();
        let req = JsonRpcRequest::new(Some(json!(1)), method, Some(params));
        srv.handle(&mut session, req).await.unwrap()
    }

    async fn tool_text(srv: &Server, name: &str, arguments: Value) -> String {
        let resp = call(srv, "tools/call", json!({"name": name, "arguments": arguments})).await;
        let result: ToolResult = serde_json::from_value(resp.result().unwrap().clone()).unwrap();
        assert!(!result.is_error);
        assert_eq!(result.content.len(), 1);
        result.content[0].as_text().to_string()
    }

    #[test]
    fn test_catalog_registers_everything() {
        let reg = reference_registry(None).unwrap();
        let tools: Vec<&str> = reg.list_tools().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tools, vec!["echo", "add", "quotify"]);
        assert!(reg.find_prompt("greeting").is_some());
        assert!(reg.find_resource("file://README.md").is_some());
        assert!(reg.find_resource("file://config.json").is_some());
    }

    #[tokio::test]
    async fn test_echo() {
        let srv = server(1);
        assert_eq!(tool_text(&srv, "echo", json!({"text": "hi"})).await, "Echo: hi");
    }

    #[tokio::test]
    async fn test_echo_missing_text_is_invalid_params() {
        let srv = server(1);
        let resp = call(&srv, "tools/call", json!({"name": "echo", "arguments": {}})).await;
        assert_eq!(resp.rpc_error().unwrap().code, ERR_CODE_BAD_PARAMS);
    }

    #[tokio::test]
    async fn test_add_computes_sum() {
        let srv = server(1);
        let text = tool_text(&srv, "add", json!({"a": 2, "b": 3})).await;
        assert_eq!(text, "Result: 2 + 3 = 5");
        assert!(!text.contains("23"));

        let text = tool_text(&srv, "add", json!({"a": 1.5, "b": -0.25})).await;
        assert_eq!(text, "Result: 1.5 + -0.25 = 1.25");
    }

    #[tokio::test]
    async fn test_add_rejects_string_operands() {
        let srv = server(1);
        let resp = call(&srv, "tools/call", json!({"name": "add", "arguments": {"a": "2", "b": "3"}})).await;
        assert_eq!(resp.rpc_error().unwrap().code, ERR_CODE_BAD_PARAMS);
    }

    #[tokio::test]
    async fn test_quotify_is_reproducible_with_seed() {
        let first = tool_text(&server(42), "quotify", json!({})).await;
        let second = tool_text(&server(42), "quotify", json!({})).await;
        assert_eq!(first, second);
        assert!(first.contains(" - "));
    }

    #[tokio::test]
    async fn test_quotify_json_format() {
        let srv = server(3);
        let text = tool_text(&srv, "quotify", json!({"format": "json"})).await;
        let quote: Value = serde_json::from_str(&text).unwrap();
        assert!(quote["text"].is_string());
        assert!(quote["author"].is_string());
    }

    #[tokio::test]
    async fn test_quotify_unknown_format() {
        let srv = server(3);
        let resp = call(&srv, "tools/call", json!({"name": "quotify", "arguments": {"format": "xml"}})).await;
        assert_eq!(resp.rpc_error().unwrap().code, ERR_CODE_BAD_PARAMS);
    }

    #[tokio::test]
    async fn test_greeting_with_name() {
        let srv = server(1);
        let resp = call(&srv, "prompts/get", json!({"name": "greeting", "arguments": {"name": "Ada"}})).await;
        let result = resp.result().unwrap();
        assert_eq!(result["description"], "A friendly greeting message");
        assert_eq!(result["messages"][0]["role"], "user");
        assert_eq!(
            result["messages"][0]["content"]["text"],
            "Hello, Ada! How are you doing today?"
        );
    }

    #[tokio::test]
    async fn test_greeting_defaults_to_world() {
        let srv = server(1);
        let resp = call(&srv, "prompts/get", json!({"name": "greeting"})).await;
        assert_eq!(
            resp.result().unwrap()["messages"][0]["content"]["text"],
            "Hello, World! How are you doing today?"
        );
    }

    #[tokio::test]
    async fn test_read_config_resource() {
        let srv = server(1);
        let resp = call(&srv, "resources/read", json!({"uri": "file://config.json"})).await;
        let content = &resp.result().unwrap()["contents"][0];
        assert_eq!(content["mimeType"], "application/json");
        let parsed: Value = serde_json::from_str(content["text"].as_str().unwrap()).unwrap();
        assert_eq!(parsed["debug"], json!(true));
    }

    #[tokio::test]
    async fn test_read_unknown_resource() {
        let srv = server(1);
        let resp = call(&srv, "resources/read", json!({"uri": "file://nope.txt"})).await;
        let result = resp.result().unwrap();
        assert_eq!(result["contents"][0]["uri"], "file://nope.txt");
        assert_eq!(result["contents"][0]["mimeType"], "text/plain");
        assert_eq!(result["contents"][0]["text"], "Error: resource not found");
    }
}
