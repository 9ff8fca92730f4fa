//! Conditional edges: route to the next node based on state.
//!
//! A source node has a routing function that maps the current state to a typed label
//! (usually a small enum, or `bool`); the label is looked up in a path map to find the
//! next node id or `END`. Labels are never strings, so a typo in a route is a compile
//! error rather than a runtime surprise.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// Marker for types usable as conditional-edge labels.
///
/// Blanket-implemented for every `Copy + Eq + Hash + Debug` type, so plain enums and
/// `bool` work without extra code.
pub trait RouteLabel: Copy + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> RouteLabel for T where T: Copy + Eq + Hash + Debug + Send + Sync + 'static {}

/// Resolves the next node id from state; `Err` carries the unmapped label (Debug form).
type ResolveFn<S> = Arc<dyn Fn(&S) -> Result<String, String> + Send + Sync>;

/// Conditional edge definition: routing function with its label → target map erased
/// behind one closure.
#[derive(Clone)]
pub struct ConditionalRouter<S> {
    resolve: ResolveFn<S>,
    targets: Vec<String>,
}

impl<S> ConditionalRouter<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Builds a router from `path: (state) -> label` and `path_map: label -> node id`.
    pub fn new<L, F>(path: F, path_map: HashMap<L, String>) -> Self
    where
        L: RouteLabel,
        F: Fn(&S) -> L + Send + Sync + 'static,
    {
        let mut targets: Vec<String> = path_map.values().cloned().collect();
        targets.sort();
        targets.dedup();
        let resolve: ResolveFn<S> = Arc::new(move |state: &S| {
            let label = path(state);
            path_map
                .get(&label)
                .cloned()
                .ok_or_else(|| format!("{:?}", label))
        });
        Self { resolve, targets }
    }

    /// Resolves the next node id (or END) from the current state.
    pub fn resolve_next(&self, state: &S) -> Result<String, String> {
        (self.resolve)(state)
    }

    /// All node ids (or END) this router can send control to.
    pub fn targets(&self) -> &[String] {
        &self.targets
    }
}

/// How to determine the next node after a given node runs.
#[derive(Clone)]
pub enum NextEntry<S> {
    /// Single fixed next node (or END). The node's `Next` is still respected.
    Unconditional(String),
    /// Next node is decided by the router from state; the node's `Next` is ignored.
    Conditional(ConditionalRouter<S>),
}
