//! Model step: send the conversation to the chat model and append its reply.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::state::AgentState;

/// Calls the model with `[System(prompt)?] + messages` and returns a one-message update
/// holding the AI reply (with any tool calls it requested).
///
/// The system prompt is prepended per call and never stored in the state. Model errors
/// end the run.
pub struct ModelNode {
    llm: Arc<dyn LlmClient>,
    system_prompt: Option<String>,
}

impl ModelNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            system_prompt: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    fn build_prompt(&self, state: &AgentState) -> Vec<Message> {
        let mut prompt = Vec::with_capacity(state.messages.len() + 1);
        if let Some(system) = &self.system_prompt {
            prompt.push(Message::system(system.clone()));
        }
        prompt.extend(state.messages.iter().cloned());
        prompt
    }
}

#[async_trait]
impl Node<AgentState> for ModelNode {
    fn id(&self) -> &str {
        "model"
    }

    async fn run(&self, state: AgentState) -> Result<(AgentState, Next), AgentError> {
        if state.messages.is_empty() {
            return Err(AgentError::ExecutionFailed(
                "model step needs at least one message".into(),
            ));
        }
        let prompt = self.build_prompt(&state);
        let response = self.llm.invoke(&prompt).await?;
        tracing::debug!(
            tool_calls = response.tool_calls.len(),
            usage = ?response.usage,
            "model replied"
        );
        Ok((
            AgentState::new(vec![response.into_message()]),
            Next::Continue,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::llm::MockLlm;

    #[tokio::test]
    async fn run_returns_single_ai_message() {
        let llm = Arc::new(MockLlm::with_no_tool_calls("hello"));
        let node = ModelNode::new(llm.clone());
        let (update, next) = node.run(AgentState::from_human("hi")).await.unwrap();
        assert_eq!(update.messages, vec![Message::ai("hello")]);
        assert_eq!(next, Next::Continue);
        assert_eq!(llm.last_messages(), vec![Message::human("hi")]);
    }

    /// **Scenario**: the system prompt goes first in the prompt but not into the state.
    #[tokio::test]
    async fn system_prompt_prepended_to_prompt_only() {
        let llm = Arc::new(MockLlm::with_no_tool_calls("ok"));
        let node = ModelNode::new(llm.clone()).with_system_prompt("be brief");
        let (update, _) = node.run(AgentState::from_human("hi")).await.unwrap();
        assert_eq!(update.messages.len(), 1);
        assert_eq!(
            llm.last_messages(),
            vec![Message::system("be brief"), Message::human("hi")]
        );
    }

    #[tokio::test]
    async fn empty_state_is_execution_failed() {
        let node = ModelNode::new(Arc::new(MockLlm::with_no_tool_calls("x")));
        let err = node.run(AgentState::default()).await.unwrap_err();
        assert!(matches!(err, AgentError::ExecutionFailed(_)));
    }
}
