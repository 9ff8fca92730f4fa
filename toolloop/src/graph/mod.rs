//! State graph: nodes + edges (plain and conditional), compile, then invoke or stream.

mod compile_error;
mod compiled;
mod conditional;
mod logging;
mod next;
mod node;
mod state_graph;
mod updater;

pub use compile_error::CompilationError;
pub use compiled::{CompiledStateGraph, DEFAULT_RECURSION_LIMIT};
pub use conditional::{ConditionalRouter, NextEntry, RouteLabel};
pub use logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_route, log_state_update,
};
pub use next::Next;
pub use node::{FnNode, Node};
pub use state_graph::{StateGraph, END, START};
pub use updater::{BoxedStateUpdater, ReplaceUpdater, StateUpdater};
