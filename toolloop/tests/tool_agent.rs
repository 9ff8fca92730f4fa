//! Integration tests for the model → router → tools loop built by `build_tool_agent`.
//!
//! No network: the model is a scripted `MockLlm`, tools are the in-process calculator.


use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio_stream::StreamExt;

use toolloop::{
    build_tool_agent, AgentError, AgentOptions, AgentState, HandleToolErrors, LlmClient,
    LlmResponse, Message, MockLlm, StreamEvent, StreamMode, ToolCall, ToolRegistry, UNKNOWN_TOOL_MESSAGE,
};

fn calculator() -> Arc<ToolRegistry> {
    Arc::new(ToolRegistry::arithmetic())
}

fn tool_reply(calls: Vec<ToolCall>) -> LlmResponse {
    LlmResponse {
        content: String::new(),
        tool_calls: calls,
        usage: None,
    }
}

/// **Scenario**: "(1+5)*6" takes two tool rounds and ends on a plain answer.
#[tokio::test]
async fn arithmetic_question_runs_two_tool_rounds() {
    let llm = Arc::new(MockLlm::arithmetic_demo());
    let agent = build_tool_agent(llm.clone(), calculator(), AgentOptions::default())
        .expect("valid graph");

    let out = agent.invoke_message("What is (1+5)*6?").await.unwrap();

    // human, ai(add), tool, ai(mult), tool, ai(answer)
    assert_eq!(out.messages.len(), 6);
    assert_eq!(llm.calls(), 3);
    assert!(matches!(&out.messages[0], Message::Human { content } if content == "What is (1+5)*6?"));
    assert!(matches!(
        &out.messages[2],
        Message::Tool { content, tool_call_id, name }
            if content == "6" && tool_call_id == "call-1" && name == "add"
    ));
    assert!(matches!(
        &out.messages[4],
        Message::Tool { content, tool_call_id, .. } if content == "36" && tool_call_id == "call-2"
    ));
    let last = out.last_message().unwrap();
    assert!(last.is_ai());
    assert!(last.tool_calls().is_empty());
    assert_eq!(out.last_ai_reply(), Some("(1+5)*6 = 36"));
}

/// **Scenario**: the model sees the whole log, including earlier tool results.
#[tokio::test]
async fn model_sees_full_history_with_system_prompt() {
    let llm = Arc::new(MockLlm::arithmetic_demo());
    let options = AgentOptions::default().with_system_prompt("You are a calculator.");
    let agent = build_tool_agent(llm.clone(), calculator(), options).unwrap();

    let out = agent.invoke_message("What is (1+5)*6?").await.unwrap();

    let seen = llm.last_messages();
    assert!(matches!(&seen[0], Message::System { content } if content == "You are a calculator."));
    assert_eq!(seen.len(), 1 + 5);
    // The system prompt is not written into the state.
    assert!(out
        .messages
        .iter()
        .all(|m| !matches!(m, Message::System { .. })));
}

/// **Scenario**: a reply without tool calls ends the run after one model step.
#[tokio::test]
async fn direct_answer_ends_immediately() {
    let llm = Arc::new(MockLlm::with_no_tool_calls("Hello!"));
    let agent = build_tool_agent(llm.clone(), calculator(), AgentOptions::default()).unwrap();

    let out = agent.invoke_message("hi").await.unwrap();

    assert_eq!(out.messages.len(), 2);
    assert_eq!(out.last_ai_reply(), Some("Hello!"));
    assert_eq!(llm.calls(), 1);
}

/// **Scenario**: a hallucinated tool name gets the fixed retry message and the model
/// gets another turn.
#[tokio::test]
async fn unknown_tool_name_asks_model_to_retry() {
    let llm = Arc::new(MockLlm::scripted([
        tool_reply(vec![ToolCall::new("c1", "divide", json!({"a": 6, "b": 3}))]),
        tool_reply(vec![ToolCall::new("c2", "add", json!({"a": 2, "b": 0}))]),
    ]));
    let agent = build_tool_agent(llm.clone(), calculator(), AgentOptions::default()).unwrap();

    let out = agent.invoke_message("6 / 3?").await.unwrap();

    assert!(matches!(
        &out.messages[2],
        Message::Tool { content, name, .. } if content == UNKNOWN_TOOL_MESSAGE && name == "divide"
    ));
    assert!(matches!(&out.messages[4], Message::Tool { content, .. } if content == "2"));
    assert_eq!(llm.calls(), 3);
}

/// **Scenario**: several calls in one reply run in order and each gets its own result.
#[tokio::test]
async fn parallel_calls_keep_request_order() {
    let llm = Arc::new(MockLlm::first_tools_then_end(
        vec![
            ToolCall::new("a", "mult", json!({"a": 2, "b": 3})),
            ToolCall::new("b", "add", json!({"a": 2, "b": 3})),
        ],
        "6 and 5",
    ));
    let agent = build_tool_agent(llm, calculator(), AgentOptions::default()).unwrap();

    let out = agent.invoke_message("2*3 and 2+3").await.unwrap();

    let results: Vec<(&str, &str)> = out
        .messages
        .iter()
        .filter_map(|m| match m {
            Message::Tool {
                content,
                tool_call_id,
                ..
            } => Some((tool_call_id.as_str(), content.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(results, vec![("a", "6"), ("b", "5")]);
}

/// **Scenario**: bad arguments end the run under the default error policy.
#[tokio::test]
async fn tool_error_propagates_by_default() {
    let llm = Arc::new(MockLlm::first_tools_then_end(
        vec![ToolCall::new("c1", "add", json!({"a": 1}))],
        "unreachable",
    ));
    let agent = build_tool_agent(llm, calculator(), AgentOptions::default()).unwrap();

    let err = agent.invoke_message("1 + ?").await.unwrap_err();

    assert!(matches!(err, AgentError::Tool { ref name, .. } if name == "add"), "{}", err);
}

/// **Scenario**: with `HandleToolErrors::Always` the error text goes back to the model.
#[tokio::test]
async fn tool_error_becomes_message_when_handled() {
    let llm = Arc::new(MockLlm::first_tools_then_end(
        vec![ToolCall::new("c1", "add", json!({"a": 1}))],
        "Please give me both numbers.",
    ));
    let options = AgentOptions::default().with_handle_tool_errors(HandleToolErrors::Always(None));
    let agent = build_tool_agent(llm, calculator(), options).unwrap();

    let out = agent.invoke_message("1 + ?").await.unwrap();

    assert!(matches!(&out.messages[2], Message::Tool { content, .. } if content.contains("'b'")));
    assert_eq!(out.last_ai_reply(), Some("Please give me both numbers."));
}

/// **Scenario**: a model that never stops calling tools hits the recursion limit.
#[tokio::test]
async fn endless_tool_calls_hit_recursion_limit() {
    let endless = (0..50).map(|i| {
        tool_reply(vec![ToolCall::new(
            format!("c{}", i),
            "add",
            json!({"a": i, "b": 1}),
        )])
    });
    let llm = Arc::new(MockLlm::scripted(endless));
    let options = AgentOptions::default().with_recursion_limit(6);
    let agent = build_tool_agent(llm.clone(), calculator(), options).unwrap();

    let err = agent.invoke_message("count forever").await.unwrap_err();

    assert!(matches!(err, AgentError::RecursionLimit(6)), "{}", err);
    assert_eq!(llm.calls(), 3);
}

/// **Scenario**: streaming values starts with the input and ends with the final state.
#[tokio::test]
async fn stream_values_tracks_each_step() {
    let llm = Arc::new(MockLlm::arithmetic_demo());
    let agent = build_tool_agent(llm, calculator(), AgentOptions::default()).unwrap();

    let events: Vec<_> = agent
        .stream(AgentState::from_human("What is (1+5)*6?"), [StreamMode::Values])
        .collect()
        .await;

    // input + 3 model steps + 2 tool steps
    assert_eq!(events.len(), 6);
    let lengths: Vec<usize> = events
        .iter()
        .map(|e| e.state().expect("values event").messages.len())
        .collect();
    assert_eq!(lengths, vec![1, 2, 3, 4, 5, 6]);
    let StreamEvent::Values(last) = events.last().unwrap() else {
        panic!("expected Values");
    };
    assert_eq!(last.last_ai_reply(), Some("(1+5)*6 = 36"));
}

/// **Scenario**: update events carry only what each node appended.
#[tokio::test]
async fn stream_updates_carry_node_output() {
    let llm = Arc::new(MockLlm::arithmetic_demo());
    let agent = build_tool_agent(llm, calculator(), AgentOptions::default()).unwrap();

    let events: Vec<_> = agent
        .stream(AgentState::from_human("What is (1+5)*6?"), [StreamMode::Updates])
        .collect()
        .await;

    let nodes: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Updates { node_id, state } => {
                assert_eq!(state.messages.len(), 1);
                Some(node_id.as_str())
            }
            _ => None,
        })
        .collect();
    assert_eq!(nodes, vec!["model", "tools", "model", "tools", "model"]);
}

/// Model client whose provider always rejects the request.
struct RejectingLlm;

#[async_trait]
impl LlmClient for RejectingLlm {
    async fn invoke(&self, _messages: &[Message]) -> Result<LlmResponse, AgentError> {
        Err(AgentError::Model("401 unauthorized".into()))
    }
}

/// **Scenario**: a provider failure ends the run with the model error, nothing retried.
#[tokio::test]
async fn model_failure_ends_the_run() {
    let options = AgentOptions::default().with_handle_tool_errors(HandleToolErrors::Always(None));
    let agent = build_tool_agent(Arc::new(RejectingLlm), calculator(), options).unwrap();

    let err = agent.invoke_message("What is (1+5)*6?").await.unwrap_err();
    assert!(matches!(err, AgentError::Model(ref m) if m.contains("401")), "{}", err);

    let events: Vec<_> = agent
        .stream(AgentState::from_human("hi"), [StreamMode::Values])
        .collect()
        .await;
    assert_eq!(events.len(), 2);
    assert!(matches!(events[1], StreamEvent::Error(AgentError::Model(_))));
}
