use async_trait::async_trait;
use serde_json::Value;

use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};

/// One callable tool: a name, a spec advertised to the model, and an async body.
///
/// Register implementations in a [`ToolRegistry`](crate::ToolRegistry), which exposes
/// them through [`ToolSource`](crate::ToolSource).
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name; must equal `spec().name`.
    fn name(&self) -> &str;

    fn spec(&self) -> ToolSpec;

    /// Runs the tool with the JSON arguments the model produced.
    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError>;
}
