//! Interactive chat session
//!
//! Each user turn runs a bounded tool loop: the model may request tool
//! calls, their results are appended to the transcript, and the model is
//! asked again until it answers in plain text or the round limit is hit.

use super::provider::ToolProvider;
use crate::llm::{BackendError, ChatMessage, LLMClient, LLMRequest};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, warn};

/// Hard cap on a single user input, keeps requests under provider limits
pub const MAX_INPUT_CHARS: usize = 175_000;
/// Tool-call rounds allowed per user turn
pub const MAX_TOOL_ROUNDS: usize = 8;

const SYSTEM_PROMPT: &str = "\
You are a helpful assistant that can scrape the web, crawl and extract \
information using the available tools. Think step by step and help the user.";

pub struct ChatSession {
    llm: Arc<dyn LLMClient>,
    tools: Arc<dyn ToolProvider>,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

impl ChatSession {
    pub fn new(llm: Arc<dyn LLMClient>, tools: Arc<dyn ToolProvider>) -> Self {
        Self {
            llm,
            tools,
            messages: vec![ChatMessage::system(SYSTEM_PROMPT)],
            temperature: 0.0,
            max_tokens: 1000,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// True when the input asks to end the session
    pub fn is_exit(input: &str) -> bool {
        matches!(input.trim().to_lowercase().as_str(), "exit" | "quit")
    }

    /// Number of transcript messages, including the system prompt
    pub fn transcript_len(&self) -> usize {
        self.messages.len()
    }

    /// Handles one user turn and returns the assistant's reply
    ///
    /// The turn keeps the transcript even when the model call fails, so a
    /// later retry still has the user's message in context.
    pub async fn handle_turn(&mut self, input: &str) -> Result<String, BackendError> {
        let truncated: String = input.chars().take(MAX_INPUT_CHARS).collect();
        if truncated.len() < input.len() {
            warn!(
                "User input truncated from {} to {} chars",
                input.chars().count(),
                MAX_INPUT_CHARS
            );
        }
        self.messages.push(ChatMessage::user(truncated));

        for round in 0..MAX_TOOL_ROUNDS {
            let request = LLMRequest::new(self.messages.clone())
                .with_tools(self.tools.tools().to_vec())
                .with_temperature(self.temperature)
                .with_max_tokens(self.max_tokens);

            let response = self.llm.chat(request).await?;

            if !response.has_tool_calls() {
                self.messages.push(ChatMessage::assistant(&response.content));
                return Ok(response.content);
            }

            debug!(
                "Round {}: model requested {} tool calls",
                round + 1,
                response.tool_calls.len()
            );
            self.messages.push(ChatMessage::assistant_with_tools(
                &response.content,
                response.tool_calls.clone(),
            ));

            for call in &response.tool_calls {
                let result = match self.tools.call(&call.name, &call.arguments).await {
                    Ok(payload) => payload,
                    Err(e) => {
                        warn!("Tool '{}' failed: {}", call.name, e);
                        format!("Tool '{}' failed: {}", call.name, e)
                    }
                };
                self.messages
                    .push(ChatMessage::tool_response(&call.call_id, result));
            }
        }

        // The model kept requesting tools past the round limit; close the
        // turn with a final no-tools request so the user still gets text.
        let request = LLMRequest::new(self.messages.clone())
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);
        let response = self.llm.chat(request).await?;
        self.messages.push(ChatMessage::assistant(&response.content));
        Ok(response.content)
    }

    /// Runs the interactive REPL until EOF or an exit command
    pub async fn run(&mut self) -> Result<(), std::io::Error> {
        let mut stdout = tokio::io::stdout();
        let names: Vec<&str> = self.tools.tools().iter().map(|t| t.name.as_str()).collect();
        stdout
            .write_all(format!("Available tools: {}\n", names.join(" ")).as_bytes())
            .await?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            stdout.write_all(b"\nYou: ").await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            if Self::is_exit(&line) {
                stdout.write_all(b"Exiting the chat.\n").await?;
                break;
            }

            match self.handle_turn(&line).await {
                Ok(reply) => {
                    stdout
                        .write_all(format!("\nAI: {reply}\n").as_bytes())
                        .await?;
                }
                Err(e) => error!("Chat turn failed: {}", e),
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("llm", &self.llm.name())
            .field("transcript_len", &self.messages.len())
            .finish()
    }
}
