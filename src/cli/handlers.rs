//! Command handlers
//!
//! Each handler assembles configuration (environment plus CLI overrides),
//! builds the collaborators, runs the command, and returns a process exit
//! code. User-facing errors go to stderr; results go to stdout.

use super::commands::{ChatArgs, ResearchArgs};
use crate::chat::{ChatSession, McpToolProvider};
use crate::config::ToolscoutConfig;
use crate::firecrawl::FirecrawlClient;
use crate::llm::{GenAIClient, LLMClient, Provider};
use crate::research::ResearchWorkflow;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

const EXIT_OK: i32 = 0;
const EXIT_RUNTIME: i32 = 1;
const EXIT_CONFIG: i32 = 2;

/// Runs the research pipeline and prints the recommendation
pub async fn handle_research(args: &ResearchArgs, quiet: bool, verbose: bool) -> i32 {
    let config = match build_config(args.backend, args.model.as_deref(), args.timeout, None) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let api_key = match config.require_firecrawl_key() {
        Ok(key) => key.to_string(),
        Err(e) => {
            eprintln!("Error: {e}");
            return EXIT_CONFIG;
        }
    };

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let llm = match GenAIClient::new(config.provider, config.model.clone(), Some(timeout)).await {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: failed to create LLM client: {e}");
            return EXIT_RUNTIME;
        }
    };
    let search = FirecrawlClient::with_timeout(api_key, timeout);

    info!(
        "Researching '{}' with {} ({})",
        args.query,
        llm.name(),
        config.model
    );

    let workflow = ResearchWorkflow::new(Arc::new(llm), Arc::new(search))
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens)
        .with_company_limit(args.limit)
        .with_max_context_size(config.max_context_size);

    let state = workflow.run(&args.query).await;

    if !quiet {
        println!("Research results for: {}", state.query);
        println!();
    }
    if verbose && !state.companies.is_empty() {
        match serde_json::to_string_pretty(&state.companies) {
            Ok(js) => {
                println!("{js}");
                println!();
            }
            Err(e) => warn!("Could not serialize companies: {}", e),
        }
    }
    println!("{}", state.analysis.unwrap_or_default());

    EXIT_OK
}

/// Starts the interactive chat REPL
pub async fn handle_chat(args: &ChatArgs) -> i32 {
    let config = match build_config(
        args.backend,
        args.model.as_deref(),
        None,
        args.mcp_command.as_deref(),
    ) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let llm = match GenAIClient::new(config.provider, config.model.clone(), Some(timeout)).await {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: failed to create LLM client: {e}");
            return EXIT_RUNTIME;
        }
    };

    // Without tools the chat agent is pointless, so a failed spawn is fatal.
    let provider = match McpToolProvider::connect(&config.mcp_command).await {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            error!("MCP startup failed: {:#}", e);
            eprintln!("Error: could not start MCP server '{}': {e}", config.mcp_command);
            return EXIT_RUNTIME;
        }
    };

    let mut session = ChatSession::new(Arc::new(llm), provider.clone())
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens);

    let result = session.run().await;
    drop(session);

    if let Ok(provider) = Arc::try_unwrap(provider) {
        if let Err(e) = provider.shutdown().await {
            warn!("MCP shutdown failed: {:#}", e);
        }
    }

    match result {
        Ok(()) => EXIT_OK,
        Err(e) => {
            error!("Chat session failed: {}", e);
            eprintln!("Error: chat session failed: {e}");
            EXIT_RUNTIME
        }
    }
}

/// Environment configuration with CLI overrides applied, validated
fn build_config(
    backend: Option<Provider>,
    model: Option<&str>,
    timeout: Option<u64>,
    mcp_command: Option<&str>,
) -> Result<ToolscoutConfig, i32> {
    let mut config = ToolscoutConfig::default();

    if let Some(backend) = backend {
        config.provider = backend;
        // A provider switch invalidates an env-supplied model name unless
        // the model was also overridden.
        if model.is_none() && std::env::var("TOOLSCOUT_MODEL").is_err() {
            config.model = ToolscoutConfig::default_model_for(backend).to_string();
        }
    }
    if let Some(model) = model {
        config.model = model.to_string();
    }
    if let Some(timeout) = timeout {
        config.request_timeout_secs = timeout;
    }
    if let Some(mcp_command) = mcp_command {
        config.mcp_command = mcp_command.to_string();
    }

    if let Err(e) = config.validate() {
        eprintln!("Error: invalid configuration: {e}");
        return Err(EXIT_CONFIG);
    }

    Ok(config)
}
