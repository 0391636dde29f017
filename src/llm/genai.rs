//! GenAI-based LLM client implementation
//!
//! This module provides an LLM client implementation using the `genai` crate,
//! supporting multiple providers (Ollama, OpenAI, Claude, Gemini, Grok, Groq)
//! with tool calling support.

use super::client::LLMClient;
use super::error::BackendError;
use super::types::{ChatMessage, LLMRequest, LLMResponse, MessageRole, ToolCall, ToolDefinition};
use async_trait::async_trait;
use clap::ValueEnum;
use genai::chat::{
    ChatMessage as GenAIChatMessage, ChatOptions, ChatRequest as GenAIChatRequest, MessageContent,
    Tool as GenAITool, ToolResponse,
};
use genai::Client;
use std::time::Duration;
use tracing::{debug, error};

/// Supported LLM providers
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Ollama local inference
    Ollama,
    /// OpenAI GPT models
    #[value(name = "openai")]
    OpenAI,
    /// Anthropic Claude
    Claude,
    /// Google Gemini
    Gemini,
    /// xAI Grok
    Grok,
    /// Groq
    Groq,
}

impl Provider {
    /// Returns the provider prefix for genai model strings
    fn prefix(&self) -> &'static str {
        match self {
            Provider::Ollama => "ollama",
            Provider::OpenAI => "openai",
            Provider::Claude => "claude",
            Provider::Gemini => "gemini",
            Provider::Grok => "grok",
            Provider::Groq => "groq",
        }
    }

    /// Returns the provider name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Ollama => "Ollama",
            Provider::OpenAI => "OpenAI",
            Provider::Claude => "Claude",
            Provider::Gemini => "Gemini",
            Provider::Grok => "Grok",
            Provider::Groq => "Groq",
        }
    }

    /// Parses a lowercase provider name
    pub fn from_lower_str(s: &str) -> Option<Self> {
        match s {
            "ollama" => Some(Provider::Ollama),
            "openai" => Some(Provider::OpenAI),
            "claude" => Some(Provider::Claude),
            "gemini" => Some(Provider::Gemini),
            "grok" => Some(Provider::Grok),
            "groq" => Some(Provider::Groq),
            _ => None,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// GenAI-based LLM client supporting multiple providers
///
/// Provider credentials and endpoints are read by genai from its standard
/// environment variables (`OLLAMA_HOST`, `OPENAI_API_KEY`,
/// `ANTHROPIC_API_KEY`, ...).
///
/// # Thread Safety
///
/// This client is thread-safe and can be shared across threads using `Arc`.
pub struct GenAIClient {
    /// GenAI client instance
    client: Client,
    /// Full model identifier (e.g., "ollama:qwen2.5:7b")
    model: String,
    /// Provider type
    provider: Provider,
    /// Request timeout
    timeout: Duration,
}

impl GenAIClient {
    /// Creates a new GenAI client
    ///
    /// # Arguments
    ///
    /// * `provider` - LLM provider to use
    /// * `model` - Model name (without provider prefix)
    /// * `timeout` - Optional request timeout (default 60s)
    pub async fn new(
        provider: Provider,
        model: String,
        timeout: Option<Duration>,
    ) -> Result<Self, BackendError> {
        let client = Client::default();

        // Build full model string (e.g., "ollama:qwen2.5:7b")
        let full_model = format!("{}:{}", provider.prefix(), model);

        debug!(
            "Creating GenAI client: provider={}, model={}",
            provider.name(),
            model,
        );

        Ok(Self {
            client,
            model: full_model,
            provider,
            timeout: timeout.unwrap_or(Duration::from_secs(60)),
        })
    }

    /// Converts our ChatMessage to genai ChatMessage
    fn convert_message(&self, msg: &ChatMessage) -> GenAIChatMessage {
        match msg.role {
            MessageRole::System => GenAIChatMessage::system(&msg.content),
            MessageRole::User => GenAIChatMessage::user(&msg.content),
            MessageRole::Assistant => {
                if let Some(ref tool_calls) = msg.tool_calls {
                    let genai_calls: Vec<genai::chat::ToolCall> = tool_calls
                        .iter()
                        .map(|tc| genai::chat::ToolCall {
                            call_id: tc.call_id.clone(),
                            fn_name: tc.name.clone(),
                            fn_arguments: tc.arguments.clone(),
                        })
                        .collect();
                    let content = MessageContent::from_tool_calls(genai_calls);
                    GenAIChatMessage::assistant(content)
                } else {
                    GenAIChatMessage::assistant(&msg.content)
                }
            }
            MessageRole::Tool => ToolResponse {
                call_id: msg.tool_call_id.clone().unwrap_or_default(),
                content: msg.content.clone(),
            }
            .into(),
        }
    }

    /// Converts our ToolDefinition to genai Tool
    fn convert_tool(&self, tool: &ToolDefinition) -> GenAITool {
        GenAITool::new(&tool.name)
            .with_description(&tool.description)
            .with_schema(tool.parameters.clone())
    }
}

#[async_trait]
impl LLMClient for GenAIClient {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
        let start = std::time::Instant::now();

        let messages: Vec<GenAIChatMessage> = request
            .messages
            .iter()
            .map(|m| self.convert_message(m))
            .collect();

        let mut genai_request = GenAIChatRequest::new(messages);

        // Some providers reject an empty tool array, so only attach tools
        // when there are any.
        if !request.tools.is_empty() {
            let tools: Vec<GenAITool> =
                request.tools.iter().map(|t| self.convert_tool(t)).collect();
            genai_request = genai_request.with_tools(tools);
        }

        let mut options = ChatOptions::default();
        if let Some(temp) = request.temperature {
            options = options.with_temperature(temp as f64);
        }
        if let Some(max_tokens) = request.max_tokens {
            options = options.with_max_tokens(max_tokens);
        }

        debug!(
            "Sending request to {}: messages={}, tools={}",
            self.provider.name(),
            request.messages.len(),
            request.tools.len()
        );

        let response = match tokio::time::timeout(
            self.timeout,
            self.client
                .exec_chat(&self.model, genai_request, Some(&options)),
        )
        .await
        {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                error!("{} API error: {}", self.provider.name(), e);
                return Err(BackendError::ApiError {
                    message: format!("{} request failed: {}", self.provider.name(), e),
                });
            }
            Err(_) => {
                error!(
                    "{} request timed out after {}s",
                    self.provider.name(),
                    self.timeout.as_secs()
                );
                return Err(BackendError::TimeoutError {
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        let content = response.first_text().unwrap_or_default().to_string();

        let tool_calls: Vec<ToolCall> = response
            .tool_calls()
            .into_iter()
            .map(|tc| ToolCall {
                call_id: tc.call_id.clone(),
                name: tc.fn_name.clone(),
                arguments: tc.fn_arguments.clone(),
            })
            .collect();

        debug!(
            "{} responded in {:.2}s: content={} chars, tool_calls={}",
            self.provider.name(),
            start.elapsed().as_secs_f64(),
            content.len(),
            tool_calls.len()
        );

        Ok(LLMResponse::with_tool_calls(
            content,
            tool_calls,
            start.elapsed(),
        ))
    }

    fn name(&self) -> &str {
        self.provider.name()
    }

    fn model_info(&self) -> Option<String> {
        Some(self.model.clone())
    }
}

impl std::fmt::Debug for GenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAIClient")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}
