//! toolloop CLI library: option types and run orchestration for the `toolloop` binary.
//!
//! Builds the calculator or document-lookup agent from [`ModelConfig`](toolloop::ModelConfig)
//! and streams each run to stdout.

pub mod run;
pub mod tool_cmd;

pub use run::{build_calculator_agent, build_rag_agent, run_turn, RagOptions, RunError, RunOptions};
pub use tool_cmd::{list_tools, show_tool, ToolShowFormat};
