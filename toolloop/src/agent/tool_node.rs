//! Tool step: execute every tool call of the last AI message, in order.
//!
//! Each call yields exactly one [`Message::Tool`] tagged with the call id and tool name.
//! A name the tool source does not know produces [`UNKNOWN_TOOL_MESSAGE`] without
//! running anything. Other tool failures follow [`HandleToolErrors`]:
//!
//! - `HandleToolErrors::Never` - errors propagate as [`AgentError::Tool`] (default)
//! - `HandleToolErrors::Always` - errors become the tool message text
//! - `HandleToolErrors::Custom(handler)` - the handler formats the tool message

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::message::Message;
use crate::state::{AgentState, ToolCall};
use crate::tool_source::{ToolSource, ToolSourceError};

/// Tool message content for a call naming a tool that does not exist.
pub const UNKNOWN_TOOL_MESSAGE: &str = "Incorrect Tool Name, Please Retry with a valid tool.";

/// Default text for a failed call under `HandleToolErrors::Always(None)`.
pub const DEFAULT_EXECUTION_ERROR_TEMPLATE: &str =
    "Error executing tool '{tool_name}' with kwargs {tool_kwargs} with error:\n {error}\n Please fix the error and try again.";

pub type ErrorHandlerFn =
    Arc<dyn Fn(&ToolSourceError, &str, &Value) -> String + Send + Sync + 'static>;

/// How the tool step treats a failing tool.
#[derive(Clone, Default)]
pub enum HandleToolErrors {
    #[default]
    Never,
    /// Report the error to the model; `Some(text)` replaces the default template.
    Always(Option<String>),
    Custom(ErrorHandlerFn),
}

impl std::fmt::Debug for HandleToolErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Never => write!(f, "HandleToolErrors::Never"),
            Self::Always(msg) => write!(f, "HandleToolErrors::Always({:?})", msg),
            Self::Custom(_) => write!(f, "HandleToolErrors::Custom(<fn>)"),
        }
    }
}

/// Truncates a string for logging, appending "..." if longer than `max_chars`.
fn truncate_for_log(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    }
}

/// Tool step over a shared [`ToolSource`].
pub struct ToolNode {
    tools: Arc<dyn ToolSource>,
    handle_tool_errors: HandleToolErrors,
}

impl ToolNode {
    pub fn new(tools: Arc<dyn ToolSource>) -> Self {
        Self {
            tools,
            handle_tool_errors: HandleToolErrors::Never,
        }
    }

    pub fn with_handle_tool_errors(mut self, handle_tool_errors: HandleToolErrors) -> Self {
        self.handle_tool_errors = handle_tool_errors;
        self
    }

    fn handle_error(&self, error: &ToolSourceError, tool_name: &str, args: &Value) -> Option<String> {
        match &self.handle_tool_errors {
            HandleToolErrors::Never => None,
            HandleToolErrors::Always(custom) => Some(custom.clone().unwrap_or_else(|| {
                DEFAULT_EXECUTION_ERROR_TEMPLATE
                    .replace("{tool_name}", tool_name)
                    .replace("{tool_kwargs}", &args.to_string())
                    .replace("{error}", &error.to_string())
            })),
            HandleToolErrors::Custom(handler) => Some(handler(error, tool_name, args)),
        }
    }

    /// Names the tool source currently offers.
    async fn known_tools(&self) -> Result<HashSet<String>, AgentError> {
        let specs = self
            .tools
            .list_tools()
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("listing tools failed: {}", e)))?;
        Ok(specs.into_iter().map(|s| s.name).collect())
    }

    /// Runs one call and returns the text for its tool message.
    ///
    /// Only a name missing from `known` counts as unknown; a `NotFound` raised while a
    /// registered tool runs is a tool failure like any other.
    async fn execute(&self, call: &ToolCall, known: &HashSet<String>) -> Result<String, AgentError> {
        if !known.contains(&call.name) {
            warn!(tool = %call.name, "Tool does not exist");
            return Ok(UNKNOWN_TOOL_MESSAGE.to_string());
        }
        let query = call
            .arguments
            .get("query")
            .and_then(|v| v.as_str())
            .unwrap_or("No query provided");
        info!(tool = %call.name, query = %query, "Calling Tool");
        match self.tools.call_tool(&call.name, call.arguments.clone()).await {
            Ok(content) => {
                info!(tool = %call.name, result_len = content.text.chars().count(), "Result length");
                debug!(
                    tool = %call.name,
                    result_preview = %truncate_for_log(&content.text, 200),
                    "Tool returned"
                );
                Ok(content.text)
            }
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool call failed");
                self.handle_error(&e, &call.name, &call.arguments)
                    .ok_or_else(|| AgentError::Tool {
                        name: call.name.clone(),
                        message: e.to_string(),
                    })
            }
        }
    }
}

#[async_trait]
impl Node<AgentState> for ToolNode {
    fn id(&self) -> &str {
        "tools"
    }

    /// Returns only the new tool messages; the agent graph appends them.
    async fn run(&self, state: AgentState) -> Result<(AgentState, Next), AgentError> {
        let calls = state.pending_tool_calls();
        if calls.is_empty() {
            return Ok((AgentState::new(Vec::new()), Next::Continue));
        }
        let known = self.known_tools().await?;
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            let content = self.execute(call, &known).await?;
            results.push(Message::tool_result(
                call.id.clone(),
                call.name.clone(),
                content,
            ));
        }
        info!(count = results.len(), "Tools Execution Complete. Back to the model!");
        Ok((AgentState::new(results), Next::Continue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::tools::{Arithmetic, ToolRegistry};

    fn calculator() -> Arc<dyn ToolSource> {
        Arc::new(
            ToolRegistry::new()
                .with_tool(Arc::new(Arithmetic::Add))
                .with_tool(Arc::new(Arithmetic::Mult)),
        )
    }

    fn requesting(calls: Vec<ToolCall>) -> AgentState {
        AgentState::new(vec![
            Message::human("(1+5)*6=?"),
            Message::ai_with_tool_calls("", calls),
        ])
    }

    /// **Scenario**: one tool message per call, in request order, with matching ids.
    #[tokio::test]
    async fn one_result_per_call_in_order() {
        let state = requesting(vec![
            ToolCall::new("c1", "add", json!({"a": 1, "b": 5})),
            ToolCall::new("c2", "mult", json!({"a": 6, "b": 6})),
        ]);
        let (update, _) = ToolNode::new(calculator()).run(state).await.unwrap();
        assert_eq!(
            update.messages,
            vec![
                Message::tool_result("c1", "add", "6"),
                Message::tool_result("c2", "mult", "36"),
            ]
        );
    }

    /// **Scenario**: an unknown tool name yields the fixed message and no error.
    #[tokio::test]
    async fn unknown_tool_yields_fixed_message() {
        let state = requesting(vec![ToolCall::new("c1", "unknownTool", json!({}))]);
        let (update, _) = ToolNode::new(calculator()).run(state).await.unwrap();
        assert_eq!(
            update.messages,
            vec![Message::tool_result(
                "c1",
                "unknownTool",
                "Incorrect Tool Name, Please Retry with a valid tool."
            )]
        );
    }

    #[tokio::test]
    async fn no_calls_appends_nothing() {
        let state = AgentState::new(vec![Message::human("hi"), Message::ai("hello")]);
        let (update, _) = ToolNode::new(calculator()).run(state).await.unwrap();
        assert!(update.messages.is_empty());
    }

    #[tokio::test]
    async fn tool_error_propagates_by_default() {
        let state = requesting(vec![ToolCall::new("c1", "add", json!({"a": 1}))]);
        let err = ToolNode::new(calculator()).run(state).await.unwrap_err();
        assert!(matches!(err, AgentError::Tool { ref name, .. } if name == "add"));
    }

    /// **Scenario**: with Always, the error text becomes the tool message.
    #[tokio::test]
    async fn tool_error_surfaces_with_always() {
        let state = requesting(vec![ToolCall::new("c1", "add", json!({"a": 1}))]);
        let node =
            ToolNode::new(calculator()).with_handle_tool_errors(HandleToolErrors::Always(None));
        let (update, _) = node.run(state).await.unwrap();
        assert_eq!(update.messages.len(), 1);
        let text = update.messages[0].content();
        assert!(text.contains("Error executing tool 'add'"), "{}", text);
        assert!(text.contains("'b'"), "{}", text);
    }

    #[tokio::test]
    async fn tool_error_custom_handler() {
        let state = requesting(vec![ToolCall::new("c1", "mult", json!({}))]);
        let node = ToolNode::new(calculator()).with_handle_tool_errors(HandleToolErrors::Custom(
            Arc::new(|_: &ToolSourceError, name: &str, _: &Value| {
                format!("{} failed", name)
            }),
        ));
        let (update, _) = node.run(state).await.unwrap();
        assert_eq!(update.messages[0].content(), "mult failed");
    }

    /// Tool whose body reports a missing resource with `NotFound`.
    struct MissingEntry;

    #[async_trait]
    impl crate::tools::Tool for MissingEntry {
        fn name(&self) -> &str {
            "lookup"
        }

        fn spec(&self) -> crate::tool_source::ToolSpec {
            crate::tool_source::ToolSpec {
                name: "lookup".into(),
                description: None,
                input_schema: json!({"type": "object"}),
            }
        }

        async fn call(
            &self,
            _args: Value,
        ) -> Result<crate::tool_source::ToolCallContent, ToolSourceError> {
            Err(ToolSourceError::NotFound("entry 42".into()))
        }
    }

    /// **Scenario**: NotFound raised inside a registered tool is a tool failure, not an
    /// unknown tool name.
    #[tokio::test]
    async fn not_found_inside_registered_tool_is_a_failure() {
        let tools: Arc<dyn ToolSource> =
            Arc::new(ToolRegistry::new().with_tool(Arc::new(MissingEntry)));
        let state = requesting(vec![ToolCall::new("c1", "lookup", json!({}))]);

        let err = ToolNode::new(tools.clone()).run(state.clone()).await.unwrap_err();
        assert!(matches!(err, AgentError::Tool { ref name, .. } if name == "lookup"));

        let node = ToolNode::new(tools).with_handle_tool_errors(HandleToolErrors::Always(None));
        let (update, _) = node.run(state).await.unwrap();
        let text = update.messages[0].content();
        assert_ne!(text, UNKNOWN_TOOL_MESSAGE);
        assert!(text.contains("entry 42"), "{}", text);
    }
}
