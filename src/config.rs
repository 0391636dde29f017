//! Configuration management for toolscout
//!
//! This module provides a configuration system that loads settings from
//! environment variables with sensible defaults. Configuration covers model
//! selection, generation parameters, the Firecrawl API key, and the MCP tool
//! provider command for the chat loop.
//!
//! # Environment Variables
//!
//! ## Toolscout Configuration
//! - `TOOLSCOUT_PROVIDER`: Provider selection (ollama|openai|claude|gemini|grok|groq) - default: "ollama"
//! - `TOOLSCOUT_MODEL`: Model name - provider-specific default
//! - `TOOLSCOUT_TEMPERATURE`: Sampling temperature - default: "0.1"
//! - `TOOLSCOUT_MAX_TOKENS`: Maximum response tokens - default: "1000"
//! - `TOOLSCOUT_REQUEST_TIMEOUT`: Timeout in seconds - default: "60"
//! - `TOOLSCOUT_MAX_CONTEXT_SIZE`: Max scraped bytes per analysis call - default: "512000" (500KB)
//! - `TOOLSCOUT_LOG_LEVEL`: Logging level - default: "info"
//! - `TOOLSCOUT_MCP_COMMAND`: Tool-provider command for the chat loop - default: "npx firecrawl-mcp"
//! - `FIRECRAWL_API_KEY`: Firecrawl credentials - **required for the research pipeline**
//!
//! ## Provider Configuration
//! These environment variables are read directly by the genai library:
//! - **Ollama**: `OLLAMA_HOST` (default: http://localhost:11434)
//! - **OpenAI**: `OPENAI_API_KEY` (required)
//! - **Claude**: `ANTHROPIC_API_KEY` (required)
//! - **Gemini**: `GOOGLE_API_KEY` (required)
//! - **Grok**: `XAI_API_KEY` (required)
//! - **Groq**: `GROQ_API_KEY` (required)

use crate::llm::Provider;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default values for configuration
const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5:7b";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f32 = 0.1;
const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_CONTEXT_SIZE: usize = 512_000; // 500KB
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_MCP_COMMAND: &str = "npx firecrawl-mcp";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid provider name
    #[error("Invalid provider: {0}. Valid options: ollama, openai, claude, gemini, grok, groq")]
    InvalidProvider(String),

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Firecrawl credentials are missing
    #[error("FIRECRAWL_API_KEY environment variable is not set")]
    MissingFirecrawlKey,
}

/// Main configuration structure for toolscout
///
/// Constructed via `Default::default()`, which loads from environment
/// variables with fallback defaults.
#[derive(Debug, Clone)]
pub struct ToolscoutConfig {
    /// LLM provider
    pub provider: Provider,

    /// Model name to use for inference (provider-specific)
    pub model: String,

    /// Sampling temperature for model calls
    pub temperature: f32,

    /// Maximum tokens per model response
    pub max_tokens: u32,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Maximum scraped content size in bytes fed to a single analysis call
    pub max_context_size: usize,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Firecrawl API key, if present in the environment
    pub firecrawl_api_key: Option<String>,

    /// Command line used to spawn the MCP tool provider for the chat loop
    pub mcp_command: String,
}

impl Default for ToolscoutConfig {
    /// Loads configuration from environment variables with defaults
    fn default() -> Self {
        let provider = env::var("TOOLSCOUT_PROVIDER")
            .ok()
            .and_then(|s| Provider::from_lower_str(&s.to_lowercase()))
            .unwrap_or(Provider::Ollama);

        let model = env::var("TOOLSCOUT_MODEL")
            .ok()
            .unwrap_or_else(|| Self::default_model_for(provider).to_string());

        let temperature = env::var("TOOLSCOUT_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse::<f32>().ok())
            .unwrap_or(DEFAULT_TEMPERATURE);

        let max_tokens = env::var("TOOLSCOUT_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);

        let request_timeout_secs = env::var("TOOLSCOUT_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let max_context_size = env::var("TOOLSCOUT_MAX_CONTEXT_SIZE")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_CONTEXT_SIZE);

        let log_level = env::var("TOOLSCOUT_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let firecrawl_api_key = env::var("FIRECRAWL_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let mcp_command =
            env::var("TOOLSCOUT_MCP_COMMAND").unwrap_or_else(|_| DEFAULT_MCP_COMMAND.to_string());

        Self {
            provider,
            model,
            temperature,
            max_tokens,
            request_timeout_secs,
            max_context_size,
            log_level,
            firecrawl_api_key,
            mcp_command,
        }
    }
}

impl ToolscoutConfig {
    /// Default model name for a provider, without the provider prefix
    pub fn default_model_for(provider: Provider) -> &'static str {
        match provider {
            Provider::Ollama => DEFAULT_OLLAMA_MODEL,
            Provider::OpenAI => DEFAULT_OPENAI_MODEL,
            Provider::Claude => "claude-3-5-haiku-latest",
            Provider::Gemini => "gemini-2.0-flash",
            Provider::Grok => "grok-2-latest",
            Provider::Groq => "llama-3.3-70b-versatile",
        }
    }

    /// Validates the configuration
    ///
    /// Checks that numeric values are in valid ranges and the log level is
    /// known. Provider-specific validation (API keys, endpoints) is handled
    /// by genai when the client is initialized.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any validation fails
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationFailed(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max tokens must be at least 1".to_string(),
            ));
        }

        if self.max_context_size < 1024 {
            return Err(ConfigError::ValidationFailed(
                "Max context size must be at least 1KB".to_string(),
            ));
        }
        if self.max_context_size > 10_485_760 {
            return Err(ConfigError::ValidationFailed(
                "Max context size cannot exceed 10MB".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        if self.mcp_command.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "MCP command cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns the Firecrawl API key or the fatal startup error
    ///
    /// The research pipeline cannot run without Firecrawl credentials; the
    /// chat loop only forwards them to the tool provider when present.
    pub fn require_firecrawl_key(&self) -> Result<&str, ConfigError> {
        self.firecrawl_api_key
            .as_deref()
            .ok_or(ConfigError::MissingFirecrawlKey)
    }
}

impl fmt::Display for ToolscoutConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Toolscout Configuration:")?;
        writeln!(f, "  Provider: {}", self.provider)?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(f, "  Temperature: {}", self.temperature)?;
        writeln!(f, "  Max Tokens: {}", self.max_tokens)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Max Context Size: {} bytes", self.max_context_size)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(
            f,
            "  Firecrawl Key: {}",
            if self.firecrawl_api_key.is_some() {
                "set"
            } else {
                "not set"
            }
        )?;
        writeln!(f, "  MCP Command: {}", self.mcp_command)?;
        Ok(())
    }
}
