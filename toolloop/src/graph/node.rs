//! Graph node trait: one step in a StateGraph.
//!
//! A node receives the current state and returns an *update* plus a [`Next`]. The graph's
//! [`StateUpdater`](super::StateUpdater) merges the update into the state: with the
//! default replace semantics the update is the whole new state, with
//! [`AppendMessages`](crate::AppendMessages) it holds only the new messages.

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;

use crate::error::AgentError;

use super::Next;

/// One step in a graph: state in, (update out, next step).
#[async_trait]
pub trait Node<S>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Node id (e.g. `"model"`, `"tools"`). Used for logging and stream events.
    fn id(&self) -> &str;

    async fn run(&self, state: S) -> Result<(S, Next), AgentError>;
}

/// Node backed by a plain function `S -> S`, for small graphs that need no I/O.
///
/// The function's return value is the update; `Next::Continue` is always returned.
pub struct FnNode<S, F> {
    id: String,
    f: F,
    _state: PhantomData<fn(S) -> S>,
}

impl<S, F> FnNode<S, F>
where
    F: Fn(S) -> S + Send + Sync,
{
    pub fn new(id: impl Into<String>, f: F) -> Self {
        Self {
            id: id.into(),
            f,
            _state: PhantomData,
        }
    }
}

#[async_trait]
impl<S, F> Node<S> for FnNode<S, F>
where
    S: Clone + Send + Sync + Debug + 'static,
    F: Fn(S) -> S + Send + Sync,
{
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, state: S) -> Result<(S, Next), AgentError> {
        Ok(((self.f)(state), Next::Continue))
    }
}
