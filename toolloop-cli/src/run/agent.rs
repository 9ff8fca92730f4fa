//! Agent construction for the CLI subcommands.

use std::sync::Arc;

use toolloop::{
    build_tool_agent, AgentOptions, ChatOpenAI, HandleToolErrors, ModelConfig, OpenAIEmbedder,
    RagTool, RecursiveCharacterSplitter, ToolAgent, ToolRegistry, VectorIndex,
};

use super::{RagOptions, RunError};

pub const CALCULATOR_SYSTEM_PROMPT: &str =
    "You are a calculator assistant. Use the add and mult tools for every arithmetic step, \
     then state the final result.";

/// Instruction for the document-lookup agent.
pub const RAG_SYSTEM_PROMPT: &str =
    "You are a Japanese-learning assistant. When the user asks about Japanese words, \
     grammar or similar information, query it with the rag tool and return the matching \
     content to the user. If nothing matches, work out what the user wants and answer \
     on your own.";

fn chat_model(config: &ModelConfig, registry: &ToolRegistry) -> ChatOpenAI {
    ChatOpenAI::with_config(config.chat_config(), config.model.clone()).with_tools(registry.list())
}

/// Calculator agent (`add`, `mult`) over the configured chat model.
pub fn build_calculator_agent(config: &ModelConfig) -> Result<ToolAgent, RunError> {
    let registry = ToolRegistry::arithmetic();
    let llm = chat_model(config, &registry);
    let options = AgentOptions::default()
        .with_system_prompt(CALCULATOR_SYSTEM_PROMPT)
        .with_recursion_limit(config.recursion_limit);
    Ok(build_tool_agent(Arc::new(llm), Arc::new(registry), options)?)
}

/// Document-lookup agent: opens (or builds) the index, then wires the `rag` tool.
///
/// Tool failures are reported back to the model instead of ending the session.
pub async fn build_rag_agent(config: &ModelConfig, rag: &RagOptions) -> Result<ToolAgent, RunError> {
    let embedder = Arc::new(OpenAIEmbedder::with_config(
        config.embedding_config(),
        config.embedding_model.clone(),
    ));
    let index = VectorIndex::open_or_build(
        &rag.document,
        &rag.persist_dir,
        &rag.collection,
        &RecursiveCharacterSplitter::default(),
        embedder,
    )
    .await?;
    tracing::info!(
        collection = %rag.collection,
        chunks = index.len(),
        "document index ready"
    );

    let registry = ToolRegistry::new().with_tool(Arc::new(
        RagTool::new(Arc::new(index)).with_top_k(rag.top_k),
    ));
    let llm = chat_model(config, &registry);
    let options = AgentOptions::default()
        .with_system_prompt(RAG_SYSTEM_PROMPT)
        .with_handle_tool_errors(HandleToolErrors::Always(None))
        .with_recursion_limit(config.recursion_limit);
    Ok(build_tool_agent(Arc::new(llm), Arc::new(registry), options)?)
}
