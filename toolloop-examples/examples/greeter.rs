//! StateGraph example: one node that greets by name.
//!
//! The single node is both entry and finish point.
//! Run: `cargo run -p toolloop-examples --example greeter -- "Bob"`

use std::sync::Arc;

use toolloop::{CompiledStateGraph, FnNode, StateGraph};

#[derive(Debug, Clone, Default)]
struct GreetState {
    name: String,
}

#[tokio::main]
async fn main() {
    let name = std::env::args().nth(1).unwrap_or_else(|| "Bob".to_string());

    let mut graph = StateGraph::<GreetState>::new();
    graph
        .add_node(
            "greeter",
            Arc::new(FnNode::new("greeter", |s: GreetState| GreetState {
                name: format!("Hey {}, how is your day going?", s.name),
            })),
        )
        .set_entry_point("greeter")
        .set_finish_point("greeter");

    let compiled: CompiledStateGraph<GreetState> = graph.compile().expect("valid graph");

    match compiled.invoke(GreetState { name }).await {
        Ok(s) => println!("{}", s.name),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
