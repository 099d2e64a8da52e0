use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::{json, Value};

use super::{ChatFormat, ChatMessage, Role};
use crate::error::LlmError;

const API_VERSION: &str = "2023-06-01";

/// Anthropic `messages` API: system prompt is a top-level field.
#[derive(Debug, Clone, Copy)]
pub struct AnthropicFormat;

impl ChatFormat for AnthropicFormat {
    fn endpoint(&self, base_url: &str) -> String {
        format!("{}/messages", base_url.trim_end_matches('/'))
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(api_key)
            .map_err(|_| LlmError::InvalidResponse("API key is not a valid header value".into()))?;
        headers.insert("x-api-key", key);
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        Ok(headers)
    }

    fn format_request(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Value {
        let system = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let turns: Vec<&ChatMessage> = messages.iter().filter(|m| m.role != Role::System).collect();

        let mut body = json!({
            "model": model,
            "messages": turns,
            "temperature": temperature,
            "max_tokens": max_tokens,
        });
        if !system.is_empty() {
            body["system"] = Value::String(system);
        }
        body
    }

    fn parse_response(&self, body: Value) -> Result<String, LlmError> {
        let blocks = body
            .get("content")
            .and_then(Value::as_array)
            .ok_or_else(|| LlmError::InvalidResponse(format!("no content in {}", body)))?;

        let text: String = blocks
            .iter()
            .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|b| b.get("text").and_then(Value::as_str))
            .collect();

        if text.is_empty() {
            return Err(LlmError::InvalidResponse("no text blocks in response".to_string()));
        }
        Ok(text)
    }
}
