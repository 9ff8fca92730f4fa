//! Tool source abstraction: list tools and call a tool by name.
//!
//! The model step advertises `list_tools()` to the chat model; the tool step dispatches
//! each requested call through `call_tool(name, args)`. [`ToolRegistry`](crate::ToolRegistry)
//! is the in-process implementation.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Tool specification advertised to the model.
///
/// `name` is the unique dispatch key; `input_schema` is a JSON Schema object for the
/// arguments.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
}

/// Result text of a single tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallContent {
    pub text: String,
}

impl ToolCallContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Errors from listing or calling tools.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    /// No tool is registered under this name.
    #[error("tool not found: {0}")]
    NotFound(String),
    /// Arguments did not match the tool's schema.
    #[error("invalid arguments: {0}")]
    InvalidInput(String),
    /// The tool ran and failed.
    #[error("tool execution failed: {0}")]
    Execution(String),
}

/// Tool source: list tools and call a tool.
///
/// Implementations must be shareable across runs (`Send + Sync`); the agent holds one
/// behind an `Arc`.
#[async_trait]
pub trait ToolSource: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    /// Calls a tool by name with JSON arguments. Unknown names return
    /// [`ToolSourceError::NotFound`] without running anything.
    async fn call_tool(&self, name: &str, arguments: Value)
        -> Result<ToolCallContent, ToolSourceError>;
}
