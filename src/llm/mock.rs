//! Queue-backed mock LLM client for tests
//!
//! Responses are handed out in FIFO order, one per `chat` call. The call
//! counter lets tests assert that a code path made (or skipped) a model call.

use super::client::LLMClient;
use super::error::BackendError;
use super::types::{LLMRequest, LLMResponse, ToolCall};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub struct MockLLMClient {
    responses: Mutex<VecDeque<MockResponse>>,
    calls: AtomicUsize,
    name: String,
}

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub error: Option<BackendError>,
}

impl MockResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
            error: None,
        }
    }

    pub fn with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
            error: None,
        }
    }

    pub fn error(error: BackendError) -> Self {
        Self {
            content: String::new(),
            tool_calls: Vec::new(),
            error: Some(error),
        }
    }
}

impl MockLLMClient {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            name: "MockLLM".to_string(),
        }
    }

    pub fn add_response(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn add_responses(&self, responses: impl IntoIterator<Item = MockResponse>) {
        let mut queue = self.responses.lock().unwrap();
        for response in responses {
            queue.push_back(response);
        }
    }

    pub fn remaining_responses(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    /// Number of `chat` calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Canned tool call against the Firecrawl MCP scrape tool
    pub fn scrape_call(call_id: impl Into<String>, url: impl Into<String>) -> ToolCall {
        ToolCall {
            call_id: call_id.into(),
            name: "firecrawl_scrape".to_string(),
            arguments: serde_json::json!({ "url": url.into() }),
        }
    }

    /// Canned tool call against the Firecrawl MCP search tool
    pub fn search_call(call_id: impl Into<String>, query: impl Into<String>) -> ToolCall {
        ToolCall {
            call_id: call_id.into(),
            name: "firecrawl_search".to_string(),
            arguments: serde_json::json!({ "query": query.into() }),
        }
    }
}

impl Default for MockLLMClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn chat(&self, _request: LLMRequest) -> Result<LLMResponse, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let response =
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| BackendError::Other {
                    message: "MockLLMClient: No more responses in queue".to_string(),
                })?;

        if let Some(error) = response.error {
            return Err(error);
        }

        if response.tool_calls.is_empty() {
            Ok(LLMResponse::text(response.content, Duration::from_millis(10)))
        } else {
            Ok(LLMResponse::with_tool_calls(
                response.content,
                response.tool_calls,
                Duration::from_millis(10),
            ))
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model_info(&self) -> Option<String> {
        Some("mock-model".to_string())
    }
}

impl std::fmt::Debug for MockLLMClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLLMClient")
            .field("name", &self.name)
            .field("remaining_responses", &self.remaining_responses())
            .finish()
    }
}
