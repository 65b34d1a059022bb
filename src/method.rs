//! Method routing table as a tagged union of decoded params.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::{
    InitializeParams, McpError, PromptGetParams, ResourceReadParams, ToolCallParams,
};

/// A request whose params have already been decoded for its method.
#[derive(Debug, Clone)]
pub enum McpMethod {
    Initialize(InitializeParams),
    Initialized,
    Ping,
    ToolsList,
    ToolsCall(ToolCallParams),
    PromptsList,
    PromptsGet(PromptGetParams),
    ResourcesList,
    ResourcesRead(ResourceReadParams),
    Exit,
    Cancelled,
}

impl McpMethod {
    /// Match `method` exactly and decode `params` into its shape.
    pub fn decode(method: &str, params: Option<Value>) -> Result<Self, McpError> {
        let call = match method {
            "initialize" => McpMethod::Initialize(required_params(method, params)?),
            "notifications/initialized" => McpMethod::Initialized,
            "ping" => McpMethod::Ping,
            "tools/list" => McpMethod::ToolsList,
            "tools/call" => McpMethod::ToolsCall(required_params(method, params)?),
            "prompts/list" => McpMethod::PromptsList,
            "prompts/get" => McpMethod::PromptsGet(required_params(method, params)?),
            "resources/list" => McpMethod::ResourcesList,
            "resources/read" => McpMethod::ResourcesRead(required_params(method, params)?),
            "exit" => McpMethod::Exit,
            "notifications/cancelled" => McpMethod::Cancelled,
            other => return Err(McpError::MethodNotFound(other.to_string())),
        };
        Ok(call)
    }

    /// False for calls that are legal on a session that hasn't been initialized
    /// even under a strict handshake.
    pub fn requires_session(&self) -> bool {
        !matches!(
            self,
            McpMethod::Initialize(_)
                | McpMethod::Initialized
                | McpMethod::Ping
                | McpMethod::Exit
                | McpMethod::Cancelled
        )
    }
}

fn required_params<T: DeserializeOwned>(method: &str, params: Option<Value>) -> Result<T, McpError> {
    let params =
        params.ok_or_else(|| McpError::InvalidParams(format!("{} requires params", method)))?;
    serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_tools_call() {
        let call = McpMethod::decode(
            "tools/call",
            Some(json!({"name": "echo", "arguments": {"text": "hi"}})),
        )
        .unwrap();
        match call {
            McpMethod::ToolsCall(p) => {
                assert_eq!(p.name, "echo");
                assert_eq!(p.arguments, json!({"text": "hi"}));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_tools_call_arguments_optional() {
        let call = McpMethod::decode("tools/call", Some(json!({"name": "echo"}))).unwrap();
        assert!(matches!(call, McpMethod::ToolsCall(p) if p.arguments.is_null()));
    }

    #[test]
    fn test_missing_params_is_invalid_params() {
        for method in ["initialize", "tools/call", "prompts/get", "resources/read"] {
            let err = McpMethod::decode(method, None).unwrap_err();
            assert!(matches!(err, McpError::InvalidParams(_)), "{method}");
        }
    }

    #[test]
    fn test_initialize_requires_protocol_version() {
        let err = McpMethod::decode("initialize", Some(json!({"capabilities": {}}))).unwrap_err();
        assert!(err.to_string().contains("protocolVersion"));
    }

    #[test]
    fn test_prompt_arguments_must_be_strings() {
        let err = McpMethod::decode(
            "prompts/get",
            Some(json!({"name": "greeting", "arguments": {"name": 5}})),
        )
        .unwrap_err();
        assert!(matches!(err, McpError::InvalidParams(_)));
    }

    #[test]
    fn test_method_match_is_case_sensitive() {
        let err = McpMethod::decode("Tools/List", None).unwrap_err();
        assert!(matches!(err, McpError::MethodNotFound(m) if m == "Tools/List"));
    }

    #[test]
    fn test_requires_session() {
        assert!(McpMethod::ToolsList.requires_session());
        assert!(!McpMethod::Ping.requires_session());
        assert!(!McpMethod::Initialized.requires_session());
    }
}
