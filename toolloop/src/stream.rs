//! Streaming types for graph runs.
//!
//! `CompiledStateGraph::stream` sends [`StreamEvent`]s over a channel while the run
//! progresses; [`StreamMode`] selects which kinds are emitted.

use std::fmt::Debug;

use crate::error::AgentError;

/// Stream mode selector: which kinds of events to emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Emit the full state: once for the input, then after each node completes.
    Values,
    /// Emit each node's own output with the node id.
    Updates,
}

/// Event emitted while running a graph.
///
/// The last `Values` event of a successful run is the final state. A failed run ends with
/// a single `Error` event.
#[derive(Debug)]
pub enum StreamEvent<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Full state snapshot.
    Values(S),
    /// What the node returned, before it was merged into the running state.
    Updates { node_id: String, state: S },
    /// The run stopped with this error.
    Error(AgentError),
}

impl<S> StreamEvent<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// The state carried by `Values` / `Updates` events.
    pub fn state(&self) -> Option<&S> {
        match self {
            StreamEvent::Values(s) => Some(s),
            StreamEvent::Updates { state, .. } => Some(state),
            StreamEvent::Error(_) => None,
        }
    }
}
