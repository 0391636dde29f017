//! CLI argument definitions

use crate::llm::Provider;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "toolscout",
    version,
    about = "LLM-driven research on developer tools",
    long_about = "Research developer tools with web search and an LLM, or chat \
                  interactively with MCP-discovered tools available to the model."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "TOOLSCOUT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Verbose output (sets log level to debug)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Research developer tools matching a query
    Research(ResearchArgs),

    /// Chat with the model, with MCP tools available
    Chat(ChatArgs),
}

#[derive(Args, Debug)]
pub struct ResearchArgs {
    /// What to research, e.g. "CI pipeline runners"
    pub query: String,

    /// LLM provider backend
    #[arg(long, value_enum)]
    pub backend: Option<Provider>,

    /// Model name, without the provider prefix
    #[arg(long)]
    pub model: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// How many extracted tools to research
    #[arg(long, default_value_t = 4)]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// LLM provider backend
    #[arg(long, value_enum)]
    pub backend: Option<Provider>,

    /// Model name, without the provider prefix
    #[arg(long)]
    pub model: Option<String>,

    /// MCP server command line to spawn for tool discovery
    #[arg(long)]
    pub mcp_command: Option<String>,
}
