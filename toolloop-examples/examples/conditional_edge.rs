//! StateGraph example: a conditional edge picks add or subtract from the state.
//!
//! `router` passes the state through; `pick_operation` maps `operation` to a typed label
//! and the path map sends it to `add` or `subtract`, then END.
//! Run: `cargo run -p toolloop-examples --example conditional_edge -- 10 - 5`

use std::sync::Arc;

use toolloop::{CompiledStateGraph, FnNode, StateGraph, END, START};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Operation {
    Add,
    Sub,
}

#[derive(Debug, Clone)]
struct ArithState {
    number1: i64,
    operation: Operation,
    number2: i64,
    result: Option<i64>,
}

fn pick_operation(state: &ArithState) -> Operation {
    state.operation
}

fn parse_args() -> Option<ArithState> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (a, op, b) = match args.as_slice() {
        [] => ("10", "-", "5"),
        [a, op, b] => (a.as_str(), op.as_str(), b.as_str()),
        _ => return None,
    };
    let operation = match op {
        "+" => Operation::Add,
        "-" => Operation::Sub,
        _ => return None,
    };
    Some(ArithState {
        number1: a.parse().ok()?,
        operation,
        number2: b.parse().ok()?,
        result: None,
    })
}

#[tokio::main]
async fn main() {
    let Some(state) = parse_args() else {
        eprintln!("usage: conditional_edge <a> <+|-> <b>");
        std::process::exit(2);
    };

    let mut graph = StateGraph::<ArithState>::new();
    graph
        .add_node("router", Arc::new(FnNode::new("router", |s: ArithState| s)))
        .add_node(
            "add",
            Arc::new(FnNode::new("add", |s: ArithState| ArithState {
                result: Some(s.number1 + s.number2),
                ..s
            })),
        )
        .add_node(
            "subtract",
            Arc::new(FnNode::new("subtract", |s: ArithState| ArithState {
                result: Some(s.number1 - s.number2),
                ..s
            })),
        )
        .add_edge(START, "router")
        .add_conditional_edges(
            "router",
            pick_operation,
            [(Operation::Add, "add"), (Operation::Sub, "subtract")],
        )
        .add_edge("add", END)
        .add_edge("subtract", END);

    let compiled: CompiledStateGraph<ArithState> = graph.compile().expect("valid graph");

    match compiled.invoke(state).await {
        Ok(s) => println!("{:?}", s.result),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
