//! toolloop CLI binary: run the calculator or document-lookup agent from the command line.
//!
//! Subcommands: `calc` (one question, arithmetic tools), `rag` (interactive lookup over a
//! document index), `tool` (list/show the calculator tools).

mod logging;
mod repl;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use toolloop::retrieval::{DEFAULT_COLLECTION, DEFAULT_PERSIST_DIR};
use toolloop::tools::DEFAULT_TOP_K;
use toolloop::ModelConfig;
use toolloop_cli::{
    build_calculator_agent, build_rag_agent, list_tools, run_turn, show_tool, RagOptions,
    RunOptions, ToolShowFormat,
};

#[derive(Parser, Debug)]
#[command(name = "toolloop")]
#[command(about = "toolloop: tool-calling chat agents from the command line")]
struct Args {
    #[command(subcommand)]
    cmd: Command,

    /// Max chars of each printed message (0 = no limit)
    #[arg(long, value_name = "N", default_value_t = 0, global = true)]
    max_len: usize,

    /// Directory holding `.env` (default: next to the executable)
    #[arg(long, value_name = "DIR", global = true)]
    env_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Ask the calculator agent one question (tools: add, mult)
    Calc(CalcArgs),
    /// Interactive lookup over a document; type `end` to quit
    Rag(RagArgs),
    /// List or show tool definitions
    Tool(ToolArgs),
}

#[derive(clap::Args, Debug, Clone)]
struct CalcArgs {
    /// User message (or pass as positional arguments)
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,
}

#[derive(clap::Args, Debug, Clone)]
struct RagArgs {
    /// Text document to index on first use
    #[arg(long, value_name = "PATH")]
    document: PathBuf,

    /// Directory for the persisted index
    #[arg(long, value_name = "DIR", default_value = DEFAULT_PERSIST_DIR)]
    persist_dir: PathBuf,

    /// Collection name inside the persist directory
    #[arg(long, value_name = "NAME", default_value = DEFAULT_COLLECTION)]
    collection: String,

    /// Chunks returned per lookup
    #[arg(short, value_name = "N", default_value_t = DEFAULT_TOP_K)]
    k: usize,
}

#[derive(clap::Args, Debug, Clone)]
struct ToolArgs {
    #[command(subcommand)]
    sub: ToolCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum ToolCommand {
    /// List all tools (name and description)
    List,
    /// Show full definition of one tool (name, description, input_schema)
    Show(ShowToolArgs),
}

#[derive(clap::Args, Debug, Clone)]
struct ShowToolArgs {
    /// Tool name (e.g. add)
    name: String,
    /// Output format
    #[arg(long, value_name = "FORMAT", value_enum, default_value_t = ToolShowFormat::Yaml)]
    output: ToolShowFormat,
}

impl CalcArgs {
    fn message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| (!self.rest.is_empty()).then(|| self.rest.join(" ")))
            .filter(|m| !m.trim().is_empty())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let applied = config::load_and_apply("toolloop", args.env_dir.as_deref())?;
    logging::init()?;
    tracing::debug!(
        dotenv = ?applied.dotenv_path,
        keys = applied.keys.len(),
        "configuration applied"
    );

    match args.cmd {
        Command::Tool(ta) => match ta.sub {
            ToolCommand::List => list_tools()?,
            ToolCommand::Show(show) => {
                if let Err(e) = show_tool(&show.name, show.output) {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            }
        },
        Command::Calc(calc) => {
            let Some(message) = calc.message() else {
                eprintln!("toolloop: provide a message via -m/--message or positional args");
                std::process::exit(1);
            };
            let agent = build_calculator_agent(&ModelConfig::from_env())?;
            let opts = RunOptions {
                message,
                display_max_len: args.max_len,
            };
            run_turn(&agent, &opts).await?;
        }
        Command::Rag(rag) => {
            let rag = RagOptions {
                document: rag.document,
                persist_dir: rag.persist_dir,
                collection: rag.collection,
                top_k: rag.k,
            };
            let agent = build_rag_agent(&ModelConfig::from_env(), &rag).await?;
            repl::run_repl_loop(&agent, args.max_len).await?;
        }
    }
    Ok(())
}
