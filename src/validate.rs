use serde_json::Value;

use crate::types::{McpError, Prompt, PromptArguments, Tool};

impl Tool {
    /// Validate arguments against the tool's input schema metadata.
    pub fn validate_arguments(&self, args: &Value) -> Result<(), McpError> {
        let Some(obj) = args.as_object() else {
            return Err(McpError::Validation("arguments must be an object".into()));
        };
        let meta = &self.schema_meta;

        for field in &meta.required {
            if !obj.contains_key(field) {
                return Err(McpError::Validation(format!(
                    "missing required field \"{}\"",
                    field
                )));
            }
        }

        for (field, value) in obj {
            if let Some(expected) = meta.property_types.get(field) {
                if !matches_type(expected, value) {
                    return Err(McpError::Validation(format!(
                        "field \"{}\" must be of type {}",
                        field, expected
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Prompt {
    /// Check that every required argument was supplied.
    pub fn validate_arguments(&self, args: &PromptArguments) -> Result<(), McpError> {
        match self
            .arguments
            .iter()
            .find(|arg| arg.required && !args.contains_key(&arg.name))
        {
            Some(arg) => Err(McpError::Validation(format!(
                "missing required argument \"{}\"",
                arg.name
            ))),
            None => Ok(()),
        }
    }
}

// Unknown type names pass; the schema may use keywords we don't check.
fn matches_type(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}
