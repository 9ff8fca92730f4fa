//! Structured tracing events for graph execution.

use std::fmt::Debug;

use crate::error::AgentError;
use crate::graph::Next;

/// Node is about to run; the input state is logged at trace level.
pub fn log_node_start<S: Debug>(node_id: &str, step: usize, state: &S) {
    tracing::debug!(node_id, step, "Starting node execution");
    tracing::trace!(node_id, state = ?state, "Node input state");
}

pub fn log_node_complete(node_id: &str, next: &Next) {
    tracing::debug!(node_id, ?next, "Node execution complete");
}

pub fn log_state_update(node_id: &str) {
    tracing::debug!(node_id, "State updated");
}

/// Conditional edge resolved `from` to `to`.
pub fn log_route(from: &str, to: &str) {
    tracing::debug!(from, to, "conditional routing");
}

pub fn log_graph_start() {
    tracing::info!("Starting graph execution");
}

pub fn log_graph_complete(steps: usize) {
    tracing::info!(steps, "Graph execution complete");
}

pub fn log_graph_error(error: &AgentError) {
    tracing::error!(%error, "Graph execution error");
}
