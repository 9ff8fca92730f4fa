//! The tool-calling agent loop: model step, router, tool step.
//!
//! ```text
//! START → model ─┬─ ToolRoute::End ──→ END
//!                └─ ToolRoute::Tools → tools → model
//! ```

mod model_node;
mod router;
mod runner;
mod tool_node;

pub use model_node::ModelNode;
pub use router::{route_tools, ToolRoute};
pub use runner::{build_tool_agent, AgentOptions, ToolAgent, MODEL_NODE, TOOLS_NODE};
pub use tool_node::{HandleToolErrors, ToolNode, UNKNOWN_TOOL_MESSAGE};
