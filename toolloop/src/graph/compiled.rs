//! Compiled state graph: immutable, supports `invoke` and `stream`.
//!
//! Built by `StateGraph::compile`. Holds the nodes, the entry node and a map from node
//! id to how its successor is chosen (fixed edge or conditional router).

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::AgentError;
use crate::stream::{StreamEvent, StreamMode};

use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_route, log_state_update,
};
use super::state_graph::END;
use super::updater::BoxedStateUpdater;
use super::{Next, NextEntry, Node};

/// Node executions allowed per run unless `with_recursion_limit` says otherwise.
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// Where a run sends stream events, and which kinds.
struct Emitter<'a, S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    tx: &'a mpsc::Sender<StreamEvent<S>>,
    modes: &'a HashSet<StreamMode>,
}

impl<S> Emitter<'_, S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    async fn values(&self, state: &S) {
        if self.modes.contains(&StreamMode::Values) {
            let _ = self.tx.send(StreamEvent::Values(state.clone())).await;
        }
    }

    async fn updates(&self, node_id: &str, update: &S) {
        if self.modes.contains(&StreamMode::Updates) {
            let _ = self
                .tx
                .send(StreamEvent::Updates {
                    node_id: node_id.to_string(),
                    state: update.clone(),
                })
                .await;
        }
    }
}

/// Compiled graph: immutable structure, ready to run.
///
/// Runs from the entry node. After each node, a conditional router (when the node has
/// one) picks the successor from state; otherwise the node's returned [`Next`] and its
/// plain edge decide. Every run is capped at `recursion_limit` node executions.
#[derive(Clone)]
pub struct CompiledStateGraph<S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) first_node_id: String,
    pub(super) next_map: HashMap<String, NextEntry<S>>,
    pub(super) state_updater: BoxedStateUpdater<S>,
    pub(super) recursion_limit: usize,
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    /// Overrides the per-run node execution cap after compile.
    pub fn with_recursion_limit(self, recursion_limit: usize) -> Self {
        Self {
            recursion_limit,
            ..self
        }
    }

    /// Picks the node to run after `current_id`, or END.
    fn resolve_next(&self, current_id: &str, state: &S, next: Next) -> Result<String, AgentError> {
        match self.next_map.get(current_id) {
            Some(NextEntry::Conditional(router)) => {
                let target =
                    router
                        .resolve_next(state)
                        .map_err(|label| AgentError::NoRoute {
                            node: current_id.to_string(),
                            label,
                        })?;
                log_route(current_id, &target);
                Ok(target)
            }
            Some(NextEntry::Unconditional(to)) => Ok(match next {
                Next::Continue => to.clone(),
                Next::Node(id) => id,
                Next::End => END.to_string(),
            }),
            None => Ok(match next {
                Next::Node(id) => id,
                Next::Continue | Next::End => END.to_string(),
            }),
        }
    }

    /// Shared run loop used by `invoke` and `stream`: steps through nodes until END.
    async fn run_loop(&self, state: &mut S, emitter: Option<&Emitter<'_, S>>) -> Result<usize, AgentError> {
        let mut current_id = self.first_node_id.clone();
        let mut steps = 0usize;

        loop {
            if steps >= self.recursion_limit {
                return Err(AgentError::RecursionLimit(self.recursion_limit));
            }
            let node = self
                .nodes
                .get(&current_id)
                .cloned()
                .ok_or_else(|| AgentError::ExecutionFailed(format!("node not found: {}", current_id)))?;

            log_node_start(&current_id, steps, &*state);
            let (update, next) = node.run(state.clone()).await?;
            steps += 1;
            log_node_complete(&current_id, &next);

            self.state_updater.apply_update(state, &update);
            log_state_update(&current_id);

            if let Some(emitter) = emitter {
                emitter.values(&*state).await;
                emitter.updates(&current_id, &update).await;
            }

            let next_id = self.resolve_next(&current_id, state, next)?;
            if next_id == END {
                return Ok(steps);
            }
            current_id = next_id;
        }
    }

    async fn run(&self, state: &mut S, emitter: Option<&Emitter<'_, S>>) -> Result<(), AgentError> {
        log_graph_start();
        match self.run_loop(state, emitter).await {
            Ok(steps) => {
                log_graph_complete(steps);
                Ok(())
            }
            Err(e) => {
                log_graph_error(&e);
                Err(e)
            }
        }
    }

    /// Runs the graph to END and returns the final state.
    ///
    /// - `Next::Continue`: follow the node's plain edge, or end if it has none.
    /// - `Next::Node(id)`: run the node with that id next.
    /// - `Next::End`: stop and return the current state.
    ///
    /// Nodes with conditional edges ignore their returned `Next`.
    pub async fn invoke(&self, state: S) -> Result<S, AgentError> {
        if self.nodes.is_empty() {
            return Err(AgentError::ExecutionFailed("empty graph".into()));
        }
        let mut state = state;
        self.run(&mut state, None).await?;
        Ok(state)
    }

    /// Streams graph execution over a channel-backed stream.
    ///
    /// With `StreamMode::Values` the input state is emitted first, then the full state
    /// after every node; the last `Values` is the final state. A failing run ends with
    /// `StreamEvent::Error`.
    pub fn stream(
        &self,
        state: S,
        stream_mode: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<StreamEvent<S>> {
        let (tx, rx) = mpsc::channel(128);
        let graph = self.clone();
        let modes: HashSet<StreamMode> = stream_mode.into();

        tokio::spawn(async move {
            let mut state = state;
            let emitter = Emitter {
                tx: &tx,
                modes: &modes,
            };
            emitter.values(&state).await;
            if let Err(e) = graph.run(&mut state, Some(&emitter)).await {
                let _ = tx.send(StreamEvent::Error(e)).await;
            }
        });

        ReceiverStream::new(rx)
    }
}
