//! Run orchestration: build an agent from the environment, stream one turn, print it.

mod agent;
mod display;

pub use agent::{
    build_calculator_agent, build_rag_agent, CALCULATOR_SYSTEM_PROMPT, RAG_SYSTEM_PROMPT,
};
pub use display::{format_message, truncate_display};

use std::path::PathBuf;

use thiserror::Error;
use tokio_stream::StreamExt;
use toolloop::{
    AgentError, AgentState, CompilationError, RetrievalError, StreamEvent, StreamMode, ToolAgent,
};

/// Options shared by every agent run from the CLI.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Human message for this turn.
    pub message: String,
    /// Max chars of message content printed per message; 0 prints everything.
    pub display_max_len: usize,
}

/// Where the document-lookup agent finds its text and its index.
#[derive(Debug, Clone)]
pub struct RagOptions {
    pub document: PathBuf,
    pub persist_dir: PathBuf,
    pub collection: String,
    pub top_k: usize,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("build agent: {0}")]
    Build(#[from] CompilationError),
    #[error("index: {0}")]
    Index(#[from] RetrievalError),
    #[error("run: {0}")]
    Run(#[from] AgentError),
    #[error("tool not found: {0}")]
    ToolNotFound(String),
    #[error("output: {0}")]
    Output(String),
}

/// Runs one turn on a fresh state and prints the last message of every streamed state.
///
/// Returns the final state, or the error that ended the stream.
pub async fn run_turn(agent: &ToolAgent, opts: &RunOptions) -> Result<AgentState, RunError> {
    let mut stream = agent.stream(
        AgentState::from_human(opts.message.clone()),
        [StreamMode::Values],
    );
    let mut last = None;
    while let Some(event) = stream.next().await {
        match event {
            StreamEvent::Values(state) => {
                if let Some(message) = state.last_message() {
                    println!("{}", format_message(message, opts.display_max_len));
                }
                last = Some(state);
            }
            StreamEvent::Updates { .. } => {}
            StreamEvent::Error(e) => return Err(e.into()),
        }
    }
    last.ok_or_else(|| RunError::Run(AgentError::ExecutionFailed("run produced no state".into())))
}
