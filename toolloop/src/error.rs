//! Agent and graph execution error types.
//!
//! Returned by `Node::run`, `LlmClient::invoke` and `CompiledStateGraph::invoke`.

use thiserror::Error;

/// Error raised while running a node or a whole graph.
///
/// Remote model failures and propagated tool failures end the run; nothing here is
/// retried.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (bad state, unknown jump target, ...).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The chat model provider could not be reached, rejected the request, or replied
    /// with something unusable.
    #[error("model call failed: {0}")]
    Model(String),

    /// A tool raised an error and the tool step was configured to propagate it.
    #[error("tool '{name}' failed: {message}")]
    Tool { name: String, message: String },

    /// The run took more node steps than the compiled graph allows.
    #[error("recursion limit of {0} steps reached without hitting END")]
    RecursionLimit(usize),

    /// A conditional router produced a label missing from its path map.
    #[error("no route for label {label} after node {node}")]
    NoRoute { node: String, label: String },
}
