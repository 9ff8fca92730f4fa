//! State graph: nodes + explicit edges (from → to) and conditional edges.
//!
//! Add nodes with `add_node`, define the flow with `add_edge(from, to)` using
//! `START` and `END` for entry/exit, and use `add_conditional_edges` to route on state.
//! Then `compile` to get a [`CompiledStateGraph`].
//!
//! # Conditional edges
//!
//! From a source node, a routing function `(state) -> label` is called after the node
//! runs; the label is looked up in the path map to find the next node id (or END). A
//! node must have either one outgoing `add_edge` or `add_conditional_edges`, not both.
//! Cycles are only allowed through conditional edges, and every run is bounded by the
//! recursion limit.
//!
//! # State updates
//!
//! By default a node's output replaces the whole state. Use `with_state_updater` to
//! merge instead (e.g. [`AppendMessages`](crate::AppendMessages) for message logs).

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use crate::graph::compile_error::CompilationError;
use crate::graph::compiled::{CompiledStateGraph, DEFAULT_RECURSION_LIMIT};
use crate::graph::conditional::{ConditionalRouter, NextEntry, RouteLabel};
use crate::graph::node::Node;
use crate::graph::updater::{BoxedStateUpdater, ReplaceUpdater};

/// Sentinel for graph entry: use as `from_id` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as `to_id` in `add_edge(last_node_id, END)`.
pub const END: &str = "__end__";

/// State graph: nodes plus explicit edges and conditional edges.
///
/// Generic over state type `S`. Accepts `Arc<dyn Node<S>>`; produces
/// `CompiledStateGraph<S>`.
pub struct StateGraph<S> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    /// Edges (from_id, to_id).
    edges: Vec<(String, String)>,
    /// Source node id -> router. Next node is resolved from state at runtime.
    conditional_edges: HashMap<String, ConditionalRouter<S>>,
    state_updater: Option<BoxedStateUpdater<S>>,
    recursion_limit: usize,
}

impl<S> Default for StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            conditional_edges: HashMap::new(),
            state_updater: None,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    /// Attaches a custom state updater controlling how node outputs are merged.
    pub fn with_state_updater(self, updater: BoxedStateUpdater<S>) -> Self {
        Self {
            state_updater: Some(updater),
            ..self
        }
    }

    /// Maximum number of node executions per run (default [`DEFAULT_RECURSION_LIMIT`]).
    pub fn with_recursion_limit(self, recursion_limit: usize) -> Self {
        Self {
            recursion_limit,
            ..self
        }
    }

    /// Adds a node; replaces any node with the same id.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Adds an edge from `from_id` to `to_id`. Use `START` and `END` for entry and exit.
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        self.edges.push((from_id.into(), to_id.into()));
        self
    }

    /// Shorthand for `add_edge(START, id)`.
    pub fn set_entry_point(&mut self, id: impl Into<String>) -> &mut Self {
        self.add_edge(START, id)
    }

    /// Shorthand for `add_edge(id, END)`.
    pub fn set_finish_point(&mut self, id: impl Into<String>) -> &mut Self {
        self.add_edge(id, END)
    }

    /// Adds conditional edges from `source`: after it runs, `path(state)` picks a label
    /// and `path_map[label]` is the next node id (or END).
    ///
    /// ```rust,ignore
    /// graph.add_conditional_edges(
    ///     "model",
    ///     route_tools,
    ///     [(ToolRoute::Tools, "tools"), (ToolRoute::End, END)],
    /// );
    /// ```
    pub fn add_conditional_edges<L, F, T>(
        &mut self,
        source: impl Into<String>,
        path: F,
        path_map: impl IntoIterator<Item = (L, T)>,
    ) -> &mut Self
    where
        L: RouteLabel,
        F: Fn(&S) -> L + Send + Sync + 'static,
        T: Into<String>,
    {
        let path_map: HashMap<L, String> = path_map
            .into_iter()
            .map(|(label, target)| (label, target.into()))
            .collect();
        self.conditional_edges
            .insert(source.into(), ConditionalRouter::new(path, path_map));
        self
    }

    /// Validates the topology and builds the executable graph.
    ///
    /// Checks that every referenced id is a node (or START/END), that exactly one edge
    /// leaves START, that END is reachable by some edge, that no node mixes plain and
    /// conditional edges, and that a graph without conditional edges forms one chain
    /// with no cycle.
    pub fn compile(self) -> Result<CompiledStateGraph<S>, CompilationError> {
        for (from, to) in &self.edges {
            if from != START && !self.nodes.contains_key(from) {
                return Err(CompilationError::NodeNotFound(from.clone()));
            }
            if to != END && !self.nodes.contains_key(to) {
                return Err(CompilationError::NodeNotFound(to.clone()));
            }
        }
        for (source, router) in &self.conditional_edges {
            if !self.nodes.contains_key(source) {
                return Err(CompilationError::NodeNotFound(source.clone()));
            }
            for target in router.targets() {
                if target != END && !self.nodes.contains_key(target) {
                    return Err(CompilationError::InvalidConditionalPathMap(target.clone()));
                }
            }
        }

        let mut start_edges = self.edges.iter().filter(|(f, _)| f == START);
        let first = match (start_edges.next(), start_edges.next()) {
            (None, _) => return Err(CompilationError::MissingStart),
            (Some((_, to)), None) => to.clone(),
            (Some(_), Some(_)) => {
                return Err(CompilationError::InvalidChain(
                    "multiple edges from START".into(),
                ))
            }
        };
        if first == END {
            return Err(CompilationError::InvalidChain("START leads directly to END".into()));
        }

        let has_end = self.edges.iter().any(|(_, t)| t == END)
            || self
                .conditional_edges
                .values()
                .any(|r| r.targets().iter().any(|t| t == END));
        if !has_end {
            return Err(CompilationError::MissingEnd);
        }

        let mut next_map: HashMap<String, NextEntry<S>> = HashMap::new();
        for (from, to) in self.edges.iter().filter(|(f, _)| f != START) {
            if next_map.contains_key(from) {
                return Err(CompilationError::InvalidChain(format!(
                    "node {} has more than one outgoing edge",
                    from
                )));
            }
            if self.conditional_edges.contains_key(from) {
                return Err(CompilationError::NodeHasBothEdgeAndConditional(from.clone()));
            }
            next_map.insert(from.clone(), NextEntry::Unconditional(to.clone()));
        }
        for (source, router) in &self.conditional_edges {
            next_map.insert(source.clone(), NextEntry::Conditional(router.clone()));
        }

        if self.conditional_edges.is_empty() {
            let mut visited = HashSet::new();
            let mut current = first.clone();
            while current != END {
                if !visited.insert(current.clone()) {
                    return Err(CompilationError::InvalidChain(format!(
                        "cycle detected at {}",
                        current
                    )));
                }
                current = match next_map.get(&current) {
                    Some(NextEntry::Unconditional(to)) => to.clone(),
                    _ => break,
                };
            }
        }

        let state_updater = self
            .state_updater
            .unwrap_or_else(|| Arc::new(ReplaceUpdater));

        Ok(CompiledStateGraph {
            nodes: self.nodes,
            first_node_id: first,
            next_map,
            state_updater,
            recursion_limit: self.recursion_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use crate::error::AgentError;
    use crate::graph::Next;

    #[derive(Clone, Debug)]
    struct DummyState(i32);

    struct DummyNode(&'static str);

    #[async_trait]
    impl Node<DummyState> for DummyNode {
        fn id(&self) -> &str {
            self.0
        }
        async fn run(&self, state: DummyState) -> Result<(DummyState, Next), AgentError> {
            Ok((DummyState(state.0 + 1), Next::Continue))
        }
    }

    fn graph_with(ids: &[&'static str]) -> StateGraph<DummyState> {
        let mut graph = StateGraph::new();
        for id in ids {
            graph.add_node(*id, Arc::new(DummyNode(id)));
        }
        graph
    }

    fn compile_err(graph: StateGraph<DummyState>) -> CompilationError {
        match graph.compile() {
            Err(e) => e,
            Ok(_) => panic!("expected compile error"),
        }
    }

    #[test]
    fn compile_linear_chain_ok() {
        let mut graph = graph_with(&["a", "b"]);
        graph.add_edge(START, "a").add_edge("a", "b").add_edge("b", END);
        assert!(graph.compile().is_ok());
    }

    /// **Scenario**: entry point equal to finish point compiles (single-node graph).
    #[test]
    fn compile_single_node_entry_and_finish() {
        let mut graph = graph_with(&["greet"]);
        graph.set_entry_point("greet").set_finish_point("greet");
        assert!(graph.compile().is_ok());
    }

    #[test]
    fn compile_fails_on_unknown_node() {
        let mut graph = graph_with(&["a"]);
        graph.add_edge(START, "a").add_edge("a", "ghost");
        assert_eq!(
            compile_err(graph),
            CompilationError::NodeNotFound("ghost".into())
        );
    }

    #[test]
    fn compile_fails_without_start() {
        let mut graph = graph_with(&["a"]);
        graph.add_edge("a", END);
        assert_eq!(compile_err(graph), CompilationError::MissingStart);
    }

    #[test]
    fn compile_fails_without_end() {
        let mut graph = graph_with(&["a", "b"]);
        graph.add_edge(START, "a").add_edge("a", "b");
        assert_eq!(compile_err(graph), CompilationError::MissingEnd);
    }

    /// **Scenario**: a plain-edge cycle is rejected when there is no conditional exit.
    #[test]
    fn compile_fails_on_plain_cycle() {
        let mut graph = graph_with(&["a", "b", "c"]);
        graph
            .add_edge(START, "a")
            .add_edge("a", "b")
            .add_edge("b", "a")
            .add_edge("c", END);
        assert!(matches!(
            compile_err(graph),
            CompilationError::InvalidChain(reason) if reason.contains("cycle")
        ));
    }

    #[test]
    fn compile_fails_on_branching_plain_edges() {
        let mut graph = graph_with(&["a", "b"]);
        graph
            .add_edge(START, "a")
            .add_edge("a", "b")
            .add_edge("a", END)
            .add_edge("b", END);
        assert!(matches!(compile_err(graph), CompilationError::InvalidChain(_)));
    }

    /// **Scenario**: Compile fails when a node has both an outgoing edge and conditional edges.
    #[test]
    fn compile_fails_when_node_has_both_edge_and_conditional() {
        let mut graph = graph_with(&["a", "b"]);
        graph.add_edge(START, "a").add_edge("a", "b").add_edge("b", END);
        graph.add_conditional_edges("a", |_: &DummyState| true, [(true, "b")]);
        assert_eq!(
            compile_err(graph),
            CompilationError::NodeHasBothEdgeAndConditional("a".into())
        );
    }

    /// **Scenario**: Compile fails when a conditional path map references a missing node.
    #[test]
    fn compile_fails_when_conditional_path_map_has_invalid_target() {
        let mut graph = graph_with(&["a"]);
        graph.add_edge(START, "a");
        graph.add_conditional_edges(
            "a",
            |s: &DummyState| s.0 > 0,
            [(true, "nonexistent"), (false, END)],
        );
        assert_eq!(
            compile_err(graph),
            CompilationError::InvalidConditionalPathMap("nonexistent".into())
        );
    }

    /// **Scenario**: a cycle through a conditional edge compiles.
    #[test]
    fn compile_allows_cycle_through_conditional_edge() {
        let mut graph = graph_with(&["a", "b"]);
        graph.add_edge(START, "a").add_edge("b", "a");
        graph.add_conditional_edges("a", |s: &DummyState| s.0 < 3, [(true, "b"), (false, END)]);
        assert!(graph.compile().is_ok());
    }
}
