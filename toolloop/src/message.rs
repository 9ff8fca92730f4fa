//! Conversation messages carried in [`AgentState::messages`](crate::AgentState).
//!
//! Roles: System (instruction), Human (user input), Ai (model reply, possibly with tool
//! calls) and Tool (result of one tool call). Order is significant and append-only.

use serde::{Deserialize, Serialize};

use crate::state::ToolCall;

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    /// System instruction; placed first in the prompt when present.
    System { content: String },
    /// User input.
    Human { content: String },
    /// Model reply. `tool_calls` is empty when the model answered directly.
    Ai {
        content: String,
        #[serde(default)]
        tool_calls: Vec<ToolCall>,
    },
    /// Result of one tool call, tagged with the id and name of the call it answers.
    Tool {
        content: String,
        tool_call_id: String,
        name: String,
    },
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// Creates a human (user) message.
    pub fn human(content: impl Into<String>) -> Self {
        Self::Human {
            content: content.into(),
        }
    }

    /// Creates an AI message without tool calls.
    pub fn ai(content: impl Into<String>) -> Self {
        Self::Ai {
            content: content.into(),
            tool_calls: vec![],
        }
    }

    /// Creates an AI message that requests the given tool calls.
    pub fn ai_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self::Ai {
            content: content.into(),
            tool_calls,
        }
    }

    /// Creates a tool result message answering call `tool_call_id`.
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::Tool {
            content: content.into(),
            tool_call_id: tool_call_id.into(),
            name: name.into(),
        }
    }

    /// Text content of any variant.
    pub fn content(&self) -> &str {
        match self {
            Self::System { content }
            | Self::Human { content }
            | Self::Ai { content, .. }
            | Self::Tool { content, .. } => content,
        }
    }

    /// Tool calls requested by an AI message; empty for every other role.
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Self::Ai { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    /// Role tag as used on the wire ("system", "human", "ai", "tool").
    pub fn role(&self) -> &'static str {
        match self {
            Self::System { .. } => "system",
            Self::Human { .. } => "human",
            Self::Ai { .. } => "ai",
            Self::Tool { .. } => "tool",
        }
    }

    pub fn is_ai(&self) -> bool {
        matches!(self, Self::Ai { .. })
    }
}
