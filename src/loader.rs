use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::types::{McpError, Prompt, Resource, SchemaMeta, Tool};

/// Load tool descriptors from a JSON file on disk.
pub fn load_tools(path: impl AsRef<Path>) -> Result<Vec<Tool>, McpError> {
    let data = std::fs::read(path)?;
    parse_tools(&data)
}

/// Parse tool descriptors from raw JSON bytes.
pub fn parse_tools(data: &[u8]) -> Result<Vec<Tool>, McpError> {
    let mut tools: Vec<Tool> = serde_json::from_slice(data)?;
    for tool in &mut tools {
        tool.schema_meta = SchemaMeta::from_schema(&tool.input_schema);
    }
    Ok(tools)
}

/// Load prompt descriptors from a JSON file on disk.
pub fn load_prompts(path: impl AsRef<Path>) -> Result<Vec<Prompt>, McpError> {
    let data = std::fs::read(path)?;
    parse_prompts(&data)
}

/// Parse prompt descriptors from raw JSON bytes.
pub fn parse_prompts(data: &[u8]) -> Result<Vec<Prompt>, McpError> {
    let prompts: Vec<Prompt> = serde_json::from_slice(data)?;
    Ok(prompts)
}

/// Load resource descriptors from a JSON file on disk.
pub fn load_resources(path: impl AsRef<Path>) -> Result<Vec<Resource>, McpError> {
    let data = std::fs::read(path)?;
    parse_resources(&data)
}

/// Parse resource descriptors from raw JSON bytes.
pub fn parse_resources(data: &[u8]) -> Result<Vec<Resource>, McpError> {
    let resources: Vec<Resource> = serde_json::from_slice(data)?;
    Ok(resources)
}

impl SchemaMeta {
    /// Extract validation metadata from a JSON Schema object.
    pub fn from_schema(schema: &Value) -> SchemaMeta {
        let mut meta = SchemaMeta::default();

        if let Some(arr) = schema.get("required").and_then(|v| v.as_array()) {
            meta.required = arr
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect();
        }

        if let Some(props) = schema.get("properties").and_then(|v| v.as_object()) {
            let mut types = HashMap::new();
            for (key, prop) in props {
                if let Some(ty) = prop.get("type").and_then(|t| t.as_str()) {
                    types.insert(key.clone(), ty.to_string());
                }
            }
            meta.property_types = types;
        }

        meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tools() {
        let json = r#"[{"name":"echo","description":"echoes","inputSchema":{"type":"object","properties":{"text":{"type":"string"}},"required":["text"]}}]"#;
        let tools = parse_tools(json.as_bytes()).unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "echo");
        assert_eq!(tools[0].schema_meta.required, vec!["text"]);
        assert_eq!(tools[0].schema_meta.property_types["text"], "string");
    }

    #[test]
    fn test_parse_tools_keeps_file_order() {
        let json = r#"[
            {"name":"b","description":"","inputSchema":{"type":"object"}},
            {"name":"a","description":"","inputSchema":{"type":"object"}}
        ]"#;
        let names: Vec<String> = parse_tools(json.as_bytes())
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_parse_prompts() {
        let json = r#"[{"name":"greeting","description":"greets","arguments":[{"name":"name","description":"who","required":true}]}]"#;
        let prompts = parse_prompts(json.as_bytes()).unwrap();
        assert_eq!(prompts[0].name, "greeting");
        assert!(prompts[0].arguments[0].required);
    }

    #[test]
    fn test_parse_prompts_arguments_default_optional() {
        let json = r#"[{"name":"p","description":"d","arguments":[{"name":"x"}]}]"#;
        let prompts = parse_prompts(json.as_bytes()).unwrap();
        assert!(!prompts[0].arguments[0].required);
    }

    #[test]
    fn test_parse_resources() {
        let json = r#"[{"uri":"file://README.md","name":"README","description":"readme","mimeType":"text/markdown"}]"#;
        let resources = parse_resources(json.as_bytes()).unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].name, "README");
        assert_eq!(resources[0].mime_type, "text/markdown");
    }

    #[test]
    fn test_load_tools_missing_file() {
        let result = load_tools("/nonexistent/path.json");
        assert!(matches!(result, Err(McpError::Io(_))));
    }

    #[test]
    fn test_parse_tools_malformed() {
        let result = parse_tools(b"{not valid json");
        assert!(matches!(result, Err(McpError::Json(_))));
    }

    #[test]
    fn test_schema_meta_without_properties() {
        let meta = SchemaMeta::from_schema(&serde_json::json!({"type": "object"}));
        assert!(meta.required.is_empty());
        assert!(meta.property_types.is_empty());
    }
}
