//! Capability registry: tools, prompts and resources with their handlers.
//!
//! Registration goes through [`RegistryBuilder`]; [`RegistryBuilder::build`]
//! freezes the set. The frozen [`Registry`] is immutable, so it can be shared
//! behind an `Arc` across connections without locking. Listings come back in
//! registration order.

use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::*;

/// Handler trait for MCP tools. Implement this or use closures.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, args: Value) -> Result<ToolResult, McpError>;
}

/// Handler trait for MCP prompts.
#[async_trait]
pub trait PromptHandler: Send + Sync {
    async fn call(&self, args: &PromptArguments) -> Result<PromptResult, McpError>;
}

/// Handler trait for MCP resources.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    async fn call(&self, uri: &str) -> Result<ResourceContent, McpError>;
}

/// Wraps an async closure over raw JSON arguments into a ToolHandler.
pub struct FnToolHandler<F> {
    f: F,
}

impl<F, Fut> FnToolHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ToolResult, McpError>> + Send + 'static,
{
    pub fn new(f: F) -> Arc<dyn ToolHandler> {
        Arc::new(Self { f })
    }
}

#[async_trait]
impl<F, Fut> ToolHandler for FnToolHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ToolResult, McpError>> + Send + 'static,
{
    async fn call(&self, args: Value) -> Result<ToolResult, McpError> {
        (self.f)(args).await
    }
}

/// Wraps an async closure over a typed argument struct into a ToolHandler.
///
/// Arguments that don't deserialize into `A` fail with
/// [`McpError::InvalidParams`] before the closure runs.
pub struct TypedToolHandler<A, F> {
    f: F,
    _args: PhantomData<fn() -> A>,
}

impl<A, F, Fut> TypedToolHandler<A, F>
where
    A: DeserializeOwned + Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ToolResult, McpError>> + Send + 'static,
{
    pub fn new(f: F) -> Arc<dyn ToolHandler> {
        Arc::new(Self {
            f,
            _args: PhantomData,
        })
    }
}

#[async_trait]
impl<A, F, Fut> ToolHandler for TypedToolHandler<A, F>
where
    A: DeserializeOwned + Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ToolResult, McpError>> + Send + 'static,
{
    async fn call(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: A =
            serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;
        (self.f)(args).await
    }
}

/// Wraps a closure into a PromptHandler.
pub struct FnPromptHandler<F> {
    f: F,
}

impl<F> FnPromptHandler<F>
where
    F: Fn(&PromptArguments) -> Result<PromptResult, McpError> + Send + Sync + 'static,
{
    pub fn new(f: F) -> Arc<dyn PromptHandler> {
        Arc::new(Self { f })
    }
}

#[async_trait]
impl<F> PromptHandler for FnPromptHandler<F>
where
    F: Fn(&PromptArguments) -> Result<PromptResult, McpError> + Send + Sync + 'static,
{
    async fn call(&self, args: &PromptArguments) -> Result<PromptResult, McpError> {
        (self.f)(args)
    }
}

/// Serves a fixed text body for a resource.
pub struct StaticResource {
    mime_type: String,
    text: String,
}

impl StaticResource {
    pub fn new(mime_type: impl Into<String>, text: impl Into<String>) -> Arc<dyn ResourceHandler> {
        Arc::new(Self {
            mime_type: mime_type.into(),
            text: text.into(),
        })
    }
}

#[async_trait]
impl ResourceHandler for StaticResource {
    async fn call(&self, uri: &str) -> Result<ResourceContent, McpError> {
        Ok(ResourceContent {
            uri: uri.to_string(),
            mime_type: self.mime_type.clone(),
            text: self.text.clone(),
        })
    }
}

/// A registered tool and its handler.
pub struct ToolEntry {
    pub tool: Tool,
    pub handler: Arc<dyn ToolHandler>,
}

pub struct PromptEntry {
    pub prompt: Prompt,
    pub handler: Arc<dyn PromptHandler>,
}

pub struct ResourceEntry {
    pub resource: Resource,
    pub handler: Arc<dyn ResourceHandler>,
}

/// Frozen capability registry.
#[derive(Default)]
pub struct Registry {
    tools: Vec<ToolEntry>,
    tool_index: HashMap<String, usize>,
    prompts: Vec<PromptEntry>,
    prompt_index: HashMap<String, usize>,
    resources: Vec<ResourceEntry>,
    resource_index: HashMap<String, usize>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Tool descriptors in registration order.
    pub fn list_tools(&self) -> Vec<&Tool> {
        self.tools.iter().map(|e| &e.tool).collect()
    }

    pub fn list_prompts(&self) -> Vec<&Prompt> {
        self.prompts.iter().map(|e| &e.prompt).collect()
    }

    pub fn list_resources(&self) -> Vec<&Resource> {
        self.resources.iter().map(|e| &e.resource).collect()
    }

    pub fn find_tool(&self, name: &str) -> Option<&ToolEntry> {
        self.tool_index.get(name).map(|&i| &self.tools[i])
    }

    pub fn find_prompt(&self, name: &str) -> Option<&PromptEntry> {
        self.prompt_index.get(name).map(|&i| &self.prompts[i])
    }

    pub fn find_resource(&self, uri: &str) -> Option<&ResourceEntry> {
        self.resource_index.get(uri).map(|&i| &self.resources[i])
    }
}

/// Collects registrations; duplicate keys are rejected immediately.
#[derive(Default)]
pub struct RegistryBuilder {
    inner: Registry,
}

impl RegistryBuilder {
    /// Register a tool. The schema metadata is (re)derived from `inputSchema`.
    pub fn tool(mut self, mut tool: Tool, handler: Arc<dyn ToolHandler>) -> Result<Self, McpError> {
        let reg = &mut self.inner;
        if reg.tool_index.contains_key(&tool.name) {
            return Err(McpError::DuplicateRegistration {
                namespace: "tool",
                key: tool.name,
            });
        }
        tool.schema_meta = SchemaMeta::from_schema(&tool.input_schema);
        reg.tool_index.insert(tool.name.clone(), reg.tools.len());
        reg.tools.push(ToolEntry { tool, handler });
        Ok(self)
    }

    pub fn prompt(mut self, prompt: Prompt, handler: Arc<dyn PromptHandler>) -> Result<Self, McpError> {
        let reg = &mut self.inner;
        if reg.prompt_index.contains_key(&prompt.name) {
            return Err(McpError::DuplicateRegistration {
                namespace: "prompt",
                key: prompt.name,
            });
        }
        reg.prompt_index.insert(prompt.name.clone(), reg.prompts.len());
        reg.prompts.push(PromptEntry { prompt, handler });
        Ok(self)
    }

    pub fn resource(
        mut self,
        resource: Resource,
        handler: Arc<dyn ResourceHandler>,
    ) -> Result<Self, McpError> {
        let reg = &mut self.inner;
        if reg.resource_index.contains_key(&resource.uri) {
            return Err(McpError::DuplicateRegistration {
                namespace: "resource",
                key: resource.uri,
            });
        }
        reg.resource_index.insert(resource.uri.clone(), reg.resources.len());
        reg.resources.push(ResourceEntry { resource, handler });
        Ok(self)
    }

    /// Freeze the registry.
    pub fn build(self) -> Registry {
        let reg = self.inner;
        tracing::debug!(
            tools = reg.tools.len(),
            prompts = reg.prompts.len(),
            resources = reg.resources.len(),
            "registry built"
        );
        reg
    }
}
