//! Scripted LLM for tests and offline examples.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::Message;
use crate::state::ToolCall;

/// Mock LLM returning queued responses in order.
///
/// Once the queue is drained every further call returns `fallback` (plain text, no tool
/// calls), so a run always reaches END. `calls()` counts invocations; `last_messages()`
/// records what the most recent call was given.
pub struct MockLlm {
    queue: Mutex<VecDeque<LlmResponse>>,
    fallback: String,
    calls: AtomicUsize,
    last_messages: Mutex<Vec<Message>>,
}

impl MockLlm {
    /// Mock that replays `responses` in order, then falls back to `"done"`.
    pub fn scripted(responses: impl IntoIterator<Item = LlmResponse>) -> Self {
        Self {
            queue: Mutex::new(responses.into_iter().collect()),
            fallback: "done".to_string(),
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    /// Mock that answers with `content` and never requests tools.
    pub fn with_no_tool_calls(content: impl Into<String>) -> Self {
        Self::scripted([]).with_fallback(content)
    }

    /// First call requests `tool_calls`, then answers with `final_answer`.
    pub fn first_tools_then_end(tool_calls: Vec<ToolCall>, final_answer: impl Into<String>) -> Self {
        Self::scripted([LlmResponse {
            content: String::new(),
            tool_calls,
            usage: None,
        }])
        .with_fallback(final_answer)
    }

    /// Replays the `(1+5)*6` conversation: `add(1, 5)`, then `mult(6, 6)`, then `"36"`.
    pub fn arithmetic_demo() -> Self {
        Self::scripted([
            LlmResponse {
                content: String::new(),
                tool_calls: vec![ToolCall::new("call-1", "add", json!({"a": 1, "b": 5}))],
                usage: None,
            },
            LlmResponse {
                content: String::new(),
                tool_calls: vec![ToolCall::new("call-2", "mult", json!({"a": 6, "b": 6}))],
                usage: None,
            },
        ])
        .with_fallback("(1+5)*6 = 36")
    }

    /// Text returned once the script is exhausted.
    pub fn with_fallback(mut self, content: impl Into<String>) -> Self {
        self.fallback = content.into();
        self
    }

    /// Number of `invoke` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Messages passed to the most recent `invoke`.
    pub fn last_messages(&self) -> Vec<Message> {
        self.last_messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_messages.lock() {
            *last = messages.to_vec();
        }
        let next = self
            .queue
            .lock()
            .map_err(|_| AgentError::Model("mock queue poisoned".into()))?
            .pop_front();
        Ok(next.unwrap_or_else(|| LlmResponse {
            content: self.fallback.clone(),
            tool_calls: vec![],
            usage: None,
        }))
    }
}
