//! State updater: how a node's output is merged into the running state.
//!
//! Per-field reducers (e.g. "append new messages") are expressed as a [`StateUpdater`]
//! implementation for the state type. The default [`ReplaceUpdater`] swaps in the node's
//! output wholesale.

use std::fmt::Debug;
use std::sync::Arc;

/// Merges a node's update into the current state.
pub trait StateUpdater<S>: Send + Sync + Debug
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn apply_update(&self, current: &mut S, update: &S);
}

/// Default updater: the node's return value replaces the whole state.
#[derive(Debug, Clone, Default)]
pub struct ReplaceUpdater;

impl<S> StateUpdater<S> for ReplaceUpdater
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn apply_update(&self, current: &mut S, update: &S) {
        *current = update.clone();
    }
}

/// Shared updater handle stored by the graph.
pub type BoxedStateUpdater<S> = Arc<dyn StateUpdater<S>>;
