//! toolscout - LLM-driven research on developer tools
//!
//! This library provides two small orchestration pipelines over external
//! services: a linear research workflow that searches and scrapes the web via
//! Firecrawl and asks an LLM to classify and recommend developer tools, and a
//! chat REPL that discovers tools from an MCP server and offers them to the
//! model for delegated calls.
//!
//! # Core Concepts
//!
//! - **LLM clients**: pluggable providers (Ollama, OpenAI, Claude, Gemini,
//!   Grok, Groq) behind the [`LLMClient`] trait
//! - **Search provider**: the Firecrawl search/scrape collaborator behind the
//!   [`SearchProvider`] trait
//! - **Research workflow**: three fixed stages (extract tools, research
//!   companies, recommend) with a catch-and-default error policy
//! - **Chat session**: an append-only transcript forwarded to the model each
//!   turn, with MCP-discovered tools available for delegation
//!
//! # Example Usage
//!
//! ```ignore
//! use toolscout::llm::{GenAIClient, Provider};
//! use toolscout::firecrawl::FirecrawlClient;
//! use toolscout::research::ResearchWorkflow;
//! use toolscout::ToolscoutConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ToolscoutConfig::default();
//! let llm = GenAIClient::new(config.provider, config.model.clone(), None).await?;
//! let search = FirecrawlClient::new(config.require_firecrawl_key()?.to_string());
//!
//! let workflow = ResearchWorkflow::new(Arc::new(llm), Arc::new(search))
//!     .with_temperature(config.temperature)
//!     .with_max_tokens(config.max_tokens);
//! let state = workflow.run("CI pipeline runners").await;
//! println!("{}", state.analysis.unwrap_or_default());
//! # Ok(())
//! # }
//! ```

// Public modules
pub mod chat;
pub mod cli;
pub mod config;
pub mod firecrawl;
pub mod llm;
pub mod research;

// Re-export key types for convenient access
pub use chat::{ChatSession, McpToolProvider, ToolProvider};
pub use config::{ConfigError, ToolscoutConfig};
pub use firecrawl::{FirecrawlClient, SearchError, SearchHit, SearchProvider};
pub use llm::{BackendError, GenAIClient, LLMClient, MockLLMClient, Provider};
pub use research::{CompanyAnalysis, CompanyInfo, ResearchState, ResearchWorkflow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_toolscout() {
        assert_eq!(NAME, "toolscout");
    }
}
