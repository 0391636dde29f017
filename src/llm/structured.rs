//! Structured-output helper
//!
//! Models are asked for a JSON object and frequently wrap it in a markdown
//! fence; this module strips the fence and deserializes into the caller's
//! type. Callers convert a failure here into their documented default value.

use super::client::LLMClient;
use super::error::BackendError;
use super::types::{ChatMessage, LLMRequest};

fn extract_json_from_markdown(content: &str) -> &str {
    let trimmed = content.trim();

    if let Some(start_idx) = trimmed.find("```json") {
        let after_fence = &trimmed[start_idx + 7..];
        if let Some(end_idx) = after_fence.find("```") {
            return after_fence[..end_idx].trim();
        }
    }

    if let Some(start_idx) = trimmed.find("```") {
        let after_fence = &trimmed[start_idx + 3..];
        if let Some(end_idx) = after_fence.find("```") {
            return after_fence[..end_idx].trim();
        }
    }

    trimmed
}

/// Sends a system+user prompt pair and parses the reply as JSON into `T`
pub async fn complete_structured<T: serde::de::DeserializeOwned>(
    client: &dyn LLMClient,
    system_prompt: &str,
    user_prompt: &str,
    temperature: f32,
    max_tokens: u32,
) -> Result<T, BackendError> {
    let request = LLMRequest::new(vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user(user_prompt),
    ])
    .with_temperature(temperature)
    .with_max_tokens(max_tokens);

    let response = client.chat(request).await?;

    let json_content = extract_json_from_markdown(&response.content);
    serde_json::from_str(json_content).map_err(|e| BackendError::ParseError {
        message: e.to_string(),
        context: json_content.chars().take(200).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::{MockLLMClient, MockResponse};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_extract_plain_json() {
        let content = r#"  {"name": "x"}  "#;
        assert_eq!(extract_json_from_markdown(content), r#"{"name": "x"}"#);
    }

    #[test]
    fn test_extract_json_fence() {
        let content = "Here you go:\n```json\n{\"name\": \"x\"}\n```\nDone.";
        assert_eq!(extract_json_from_markdown(content), r#"{"name": "x"}"#);
    }

    #[test]
    fn test_extract_bare_fence() {
        let content = "```\n{\"name\": \"x\"}\n```";
        assert_eq!(extract_json_from_markdown(content), r#"{"name": "x"}"#);
    }

    #[tokio::test]
    async fn test_complete_structured_parses_fenced_json() {
        let client = MockLLMClient::new();
        client.add_response(MockResponse::text(
            "```json\n{\"name\": \"pytest\", \"count\": 3}\n```",
        ));

        let parsed: Sample = complete_structured(&client, "sys", "user", 0.1, 100)
            .await
            .unwrap();
        assert_eq!(
            parsed,
            Sample {
                name: "pytest".to_string(),
                count: 3
            }
        );
    }

    #[tokio::test]
    async fn test_complete_structured_parse_failure() {
        let client = MockLLMClient::new();
        client.add_response(MockResponse::text("not json at all"));

        let result: Result<Sample, _> = complete_structured(&client, "sys", "user", 0.1, 100).await;
        assert!(matches!(result, Err(BackendError::ParseError { .. })));
    }
}
