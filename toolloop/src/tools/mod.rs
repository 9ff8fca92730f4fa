//! Built-in tools and the name-keyed registry that dispatches them.

mod calculator;
mod registry;
mod retriever;
mod r#trait;

pub use calculator::{Arithmetic, TOOL_ADD, TOOL_MULT};
pub use r#trait::Tool;
pub use registry::ToolRegistry;
pub use retriever::{RagTool, DEFAULT_TOP_K, TOOL_RAG};
