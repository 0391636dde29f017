//! LLM client abstractions and implementations
//!
//! The [`LLMClient`] trait is the seam between the pipelines and any model
//! provider. [`GenAIClient`] is the production implementation backed by the
//! `genai` crate; [`MockLLMClient`] is a queue-backed test double.

pub mod client;
pub mod error;
pub mod genai;
pub mod mock;
pub mod structured;
pub mod types;

pub use client::{complete, LLMClient};
pub use error::BackendError;
pub use genai::{GenAIClient, Provider};
pub use mock::{MockLLMClient, MockResponse};
pub use structured::complete_structured;
pub use types::{ChatMessage, LLMRequest, LLMResponse, MessageRole, ToolCall, ToolDefinition};
