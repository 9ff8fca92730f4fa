//! Tool-calling agent with the `add` and `mult` tools.
//!
//! Without `--live` the model is a scripted mock that answers "(1+5)*6" in two tool
//! rounds. With `--live` the chat model comes from the environment (`OPENAI_API_KEY`,
//! `OPENAI_BASE_URL`, `OPENAI_MODEL`; `.env` next to the binary is honored).
//!
//! Run: `cargo run -p toolloop-examples --example calculator_agent -- [--live] "(1+5)*6=?"`

use std::sync::Arc;

use tokio_stream::StreamExt;
use toolloop::{
    build_tool_agent, AgentOptions, AgentState, ChatOpenAI, LlmClient, MockLlm, ModelConfig,
    StreamEvent, StreamMode, ToolRegistry,
};

#[tokio::main]
async fn main() {
    let mut live = false;
    let mut words = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--live" {
            live = true;
        } else {
            words.push(arg);
        }
    }
    let question = if words.is_empty() {
        "(1+5)*6=?".to_string()
    } else {
        words.join(" ")
    };

    let registry = ToolRegistry::arithmetic();
    let llm: Arc<dyn LlmClient> = if live {
        if let Err(e) = config::load_and_apply("toolloop", None) {
            eprintln!("config error: {e}");
            std::process::exit(1);
        }
        let model = ModelConfig::from_env();
        Arc::new(
            ChatOpenAI::with_config(model.chat_config(), model.model.clone())
                .with_tools(registry.list()),
        )
    } else {
        Arc::new(MockLlm::arithmetic_demo())
    };

    let agent = build_tool_agent(llm, Arc::new(registry), AgentOptions::default())
        .expect("valid graph");

    let mut stream = agent.stream(AgentState::from_human(question), [StreamMode::Values]);
    while let Some(event) = stream.next().await {
        match event {
            StreamEvent::Values(state) => {
                if let Some(m) = state.last_message() {
                    println!("[{}] {}", m.role(), m.content());
                    for call in m.tool_calls() {
                        println!("    -> {}({})", call.name, call.arguments);
                    }
                }
            }
            StreamEvent::Updates { .. } => {}
            StreamEvent::Error(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
    }
}
