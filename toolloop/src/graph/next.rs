//! Next-step result from a graph node: follow the outgoing edge, jump to a node, or end.

/// Next step after running a node.
///
/// - **Continue**: follow the node's outgoing edge (END when it has none).
/// - **Node(id)**: run the given node next.
/// - **End**: stop and return the current state.
///
/// Ignored for nodes with conditional edges; their router decides instead.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Next {
    Continue,
    Node(String),
    End,
}
