//! Graph compilation error.
//!
//! Returned by `StateGraph::compile` when edges reference unknown nodes, the entry is
//! missing, or a plain chain loops back on itself.

use thiserror::Error;

/// Error when compiling a state graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompilationError {
    /// A node id in an edge was not registered via `add_node` (and is not START/END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No edge leaves START.
    #[error("graph must have exactly one edge from START")]
    MissingStart,

    /// Neither a plain edge nor a conditional path map reaches END.
    #[error("graph has no path to END")]
    MissingEnd,

    /// Plain edges branch or cycle without any conditional edge to break out.
    #[error("invalid edge chain: {0}")]
    InvalidChain(String),

    /// A node has both an outgoing edge and conditional edges; it must have exactly one.
    #[error("node has both edge and conditional edges: {0}")]
    NodeHasBothEdgeAndConditional(String),

    /// A value in a conditional path map is not a registered node id or END.
    #[error("conditional path_map invalid target: {0}")]
    InvalidConditionalPathMap(String),
}
