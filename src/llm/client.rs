use super::error::BackendError;
use super::types::{ChatMessage, LLMRequest, LLMResponse};
use async_trait::async_trait;

/// Provider-agnostic LLM client
///
/// The pipelines only ever talk to this trait, so any provider (or a test
/// double) can stand behind them.
#[async_trait]
pub trait LLMClient: Send + Sync {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError>;

    fn name(&self) -> &str;

    fn model_info(&self) -> Option<String> {
        None
    }
}

/// Sends a system+user prompt pair and returns the text reply
///
/// Convenience wrapper for the single-shot completion calls the research
/// pipeline makes.
pub async fn complete(
    client: &dyn LLMClient,
    system_prompt: &str,
    user_prompt: &str,
    temperature: f32,
    max_tokens: u32,
) -> Result<String, BackendError> {
    let request = LLMRequest::new(vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user(user_prompt),
    ])
    .with_temperature(temperature)
    .with_max_tokens(max_tokens);

    let response = client.chat(request).await?;
    Ok(response.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct TestClient;

    #[async_trait]
    impl LLMClient for TestClient {
        async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
            assert_eq!(request.messages.len(), 2);
            Ok(LLMResponse::text("Test response", Duration::from_millis(10)))
        }

        fn name(&self) -> &str {
            "TestClient"
        }
    }

    #[tokio::test]
    async fn test_client_trait() {
        let client = TestClient;
        assert_eq!(client.name(), "TestClient");
        assert!(client.model_info().is_none());
    }

    #[tokio::test]
    async fn test_complete_returns_content() {
        let client = TestClient;
        let content = complete(&client, "system", "user", 0.1, 100).await.unwrap();
        assert_eq!(content, "Test response");
    }
}
