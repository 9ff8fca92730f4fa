//! Tool agent runner: builds the model/tool graph and runs it.

use std::collections::HashSet;
use std::sync::Arc;

use tokio_stream::wrappers::ReceiverStream;

use crate::error::AgentError;
use crate::graph::{CompilationError, CompiledStateGraph, StateGraph, DEFAULT_RECURSION_LIMIT, END, START};
use crate::llm::LlmClient;
use crate::state::{AgentState, AppendMessages};
use crate::stream::{StreamEvent, StreamMode};
use crate::tool_source::ToolSource;

use super::model_node::ModelNode;
use super::router::{route_tools, ToolRoute};
use super::tool_node::{HandleToolErrors, ToolNode};

pub const MODEL_NODE: &str = "model";
pub const TOOLS_NODE: &str = "tools";

/// Knobs for [`build_tool_agent`].
#[derive(Debug, Clone)]
pub struct AgentOptions {
    /// Instruction prepended to every model call.
    pub system_prompt: Option<String>,
    pub handle_tool_errors: HandleToolErrors,
    /// Node executions allowed per run (model and tool steps both count).
    pub recursion_limit: usize,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            system_prompt: None,
            handle_tool_errors: HandleToolErrors::Never,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl AgentOptions {
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_handle_tool_errors(mut self, handle: HandleToolErrors) -> Self {
        self.handle_tool_errors = handle;
        self
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }
}

/// Compiled `model → route_tools → {END | tools → model}` loop over [`AgentState`].
#[derive(Clone)]
pub struct ToolAgent {
    graph: CompiledStateGraph<AgentState>,
}

/// Wires the model step, router and tool step into a [`ToolAgent`].
///
/// `llm` should advertise the same tools `tools` executes (e.g.
/// `ChatOpenAI::with_tools(registry.list())`).
pub fn build_tool_agent(
    llm: Arc<dyn LlmClient>,
    tools: Arc<dyn ToolSource>,
    options: AgentOptions,
) -> Result<ToolAgent, CompilationError> {
    let mut model = ModelNode::new(llm);
    if let Some(prompt) = options.system_prompt {
        model = model.with_system_prompt(prompt);
    }
    let tool_node = ToolNode::new(tools).with_handle_tool_errors(options.handle_tool_errors);

    let mut graph = StateGraph::<AgentState>::new()
        .with_state_updater(Arc::new(AppendMessages))
        .with_recursion_limit(options.recursion_limit);
    graph
        .add_node(MODEL_NODE, Arc::new(model))
        .add_node(TOOLS_NODE, Arc::new(tool_node))
        .add_edge(START, MODEL_NODE)
        .add_edge(TOOLS_NODE, MODEL_NODE)
        .add_conditional_edges(
            MODEL_NODE,
            route_tools,
            [(ToolRoute::Tools, TOOLS_NODE), (ToolRoute::End, END)],
        );
    Ok(ToolAgent {
        graph: graph.compile()?,
    })
}

impl ToolAgent {
    /// Runs until the model stops requesting tools; returns the full message log.
    pub async fn invoke(&self, state: AgentState) -> Result<AgentState, AgentError> {
        self.graph.invoke(state).await
    }

    /// Runs a fresh conversation starting from one human message.
    pub async fn invoke_message(&self, text: impl Into<String>) -> Result<AgentState, AgentError> {
        self.invoke(AgentState::from_human(text)).await
    }

    pub fn stream(
        &self,
        state: AgentState,
        stream_mode: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<StreamEvent<AgentState>> {
        self.graph.stream(state, stream_mode)
    }

    pub fn graph(&self) -> &CompiledStateGraph<AgentState> {
        &self.graph
    }
}
