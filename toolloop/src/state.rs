//! Agent state threaded through the tool-calling loop.
//!
//! [`AgentState`] is an ordered message log. Nodes return only the messages they add;
//! [`AppendMessages`] concatenates them onto the current log so nothing is ever
//! replaced or reordered.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::graph::StateUpdater;
use crate::message::Message;

/// A single tool invocation requested by the model.
///
/// `arguments` is the JSON object the model produced for the call; `id` correlates the
/// call with the [`Message::Tool`] that answers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Message-log state for the model/tool loop.
///
/// Created once per run with the initial human message; the model step appends one AI
/// message per call and the tool step appends one tool message per requested call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub messages: Vec<Message>,
}

impl AgentState {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// State holding a single human message.
    pub fn from_human(content: impl Into<String>) -> Self {
        Self::new(vec![Message::human(content)])
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Tool calls carried by the last message (empty unless it is an AI message with calls).
    pub fn pending_tool_calls(&self) -> &[ToolCall] {
        self.messages
            .last()
            .map(Message::tool_calls)
            .unwrap_or(&[])
    }

    /// Content of the chronologically last AI message, if any.
    pub fn last_ai_reply(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::Ai { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }
}

/// Append-only merge for [`AgentState`]: the update's messages are concatenated onto the
/// current log.
#[derive(Debug, Clone, Default)]
pub struct AppendMessages;

impl StateUpdater<AgentState> for AppendMessages {
    fn apply_update(&self, current: &mut AgentState, update: &AgentState) {
        current.messages.extend(update.messages.iter().cloned());
    }
}
