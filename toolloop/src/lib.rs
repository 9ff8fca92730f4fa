//! toolloop: a small state graph runner for tool-calling chat agents.
//!
//! Build a [`StateGraph`] from nodes and edges (plain or conditional), compile it and
//! invoke or stream it with a state value. The [`agent`] module wires the usual loop:
//! a model step asks the LLM, [`route_tools`] inspects the reply, and a tool step runs
//! the requested tools before handing control back to the model.
//!
//! Main modules: [`graph`] (StateGraph, CompiledStateGraph, Node, Next), [`llm`]
//! ([`LlmClient`], [`ChatOpenAI`], [`MockLlm`]), [`tool_source`] ([`ToolSource`],
//! [`ToolSpec`]), [`tools`] (arithmetic and retrieval tools, [`ToolRegistry`]),
//! [`retrieval`] (splitter, embedder, persisted [`VectorIndex`]).

pub mod agent;
pub mod error;
pub mod graph;
pub mod llm;
pub mod message;
pub mod model_config;
pub mod retrieval;
pub mod state;
pub mod stream;
pub mod tool_source;
pub mod tools;

pub use agent::{
    build_tool_agent, route_tools, AgentOptions, HandleToolErrors, ModelNode, ToolAgent, ToolNode,
    ToolRoute, UNKNOWN_TOOL_MESSAGE,
};
pub use error::AgentError;
pub use graph::{
    CompilationError, CompiledStateGraph, FnNode, Next, Node, ReplaceUpdater, RouteLabel,
    StateGraph, StateUpdater, DEFAULT_RECURSION_LIMIT, END, START,
};
pub use llm::{ChatOpenAI, LlmClient, LlmResponse, LlmUsage, MockLlm, ToolChoiceMode};
pub use message::Message;
pub use model_config::{ModelConfig, DEFAULT_CHAT_MODEL};
pub use retrieval::{
    load_document, Embedder, OpenAIEmbedder, RecursiveCharacterSplitter, RetrievalError,
    ScoredChunk, VectorIndex,
};
pub use state::{AgentState, AppendMessages, ToolCall};
pub use stream::{StreamEvent, StreamMode};
pub use tool_source::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};
pub use tools::{Arithmetic, RagTool, Tool, ToolRegistry, TOOL_ADD, TOOL_MULT, TOOL_RAG};
