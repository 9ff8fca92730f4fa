//! Interactive loop for the `rag` subcommand: read a line, run one turn, repeat.
//!
//! Every turn starts from a fresh state holding only the new line.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use toolloop::ToolAgent;
use toolloop_cli::{run_turn, RunOptions};

/// Typing this exact line ends the session.
const END_COMMAND: &str = "end";

/// What to do with one line read from stdin.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Stop,
    Skip,
    Ask(String),
}

fn classify(line: Option<String>) -> Input {
    match line {
        None => Input::Stop,
        Some(s) if s == END_COMMAND => Input::Stop,
        Some(s) if s.trim().is_empty() => Input::Skip,
        Some(s) => Input::Ask(s),
    }
}

/// Runs the loop: prompt, read line, run agent, print, repeat.
///
/// Exits on EOF (Ctrl+D) or a line that is exactly `end`. Empty lines are skipped. A failed
/// turn is printed to stderr and the loop continues.
pub async fn run_repl_loop(
    agent: &ToolAgent,
    display_max_len: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = BufReader::new(tokio::io::stdin()).lines();
    println!("agent started; type `{}` to quit", END_COMMAND);

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let message = match classify(reader.next_line().await?) {
            Input::Stop => break,
            Input::Skip => continue,
            Input::Ask(s) => s,
        };

        let opts = RunOptions {
            message,
            display_max_len,
        };
        if let Err(e) = run_turn(agent, &opts).await {
            tracing::warn!(error = %e, "turn failed");
            eprintln!("error: {}", e);
        }
    }

    println!("Bye.");
    Ok(())
}
