use crate::message::Message;
use crate::state::AgentState;

/// Outcome of the router after a model step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolRoute {
    /// The model answered without requesting tools; the run ends.
    End,
    /// The last AI message requested tools; run the tool step.
    Tools,
}

/// Routes on the last message: `Tools` iff it is an AI message with at least one tool
/// call, `End` otherwise (including an empty log).
pub fn route_tools(state: &AgentState) -> ToolRoute {
    match state.last_message() {
        Some(Message::Ai { tool_calls, .. }) if !tool_calls.is_empty() => ToolRoute::Tools,
        _ => ToolRoute::End,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::state::ToolCall;

    #[test]
    fn no_tool_calls_ends() {
        let state = AgentState::new(vec![Message::human("hi"), Message::ai("hello")]);
        assert_eq!(route_tools(&state), ToolRoute::End);
    }

    /// **Scenario**: any tool call, even to an unknown tool, routes to the tool step.
    #[test]
    fn tool_calls_route_to_tools() {
        let state = AgentState::new(vec![
            Message::human("(1+5)*6=?"),
            Message::ai_with_tool_calls(
                "",
                vec![ToolCall::new("c1", "addTool", json!({"a": 1, "b": 5}))],
            ),
        ]);
        assert_eq!(route_tools(&state), ToolRoute::Tools);
    }

    #[test]
    fn non_ai_last_message_ends() {
        assert_eq!(route_tools(&AgentState::default()), ToolRoute::End);
        let state = AgentState::new(vec![Message::tool_result("c1", "add", "6")]);
        assert_eq!(route_tools(&state), ToolRoute::End);
    }
}
