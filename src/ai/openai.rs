use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};

use super::{ChatFormat, ChatMessage};
use crate::error::LlmError;

const REFERER: &str = "https://github.com/llm-git-commits/llm-git-commits";
const TITLE: &str = "Git Commit Tool";

/// `chat/completions` shape shared by OpenAI and OpenRouter.
#[derive(Debug, Clone, Copy)]
pub struct OpenAiFormat {
    attribution: bool,
}

impl OpenAiFormat {
    /// OpenRouter wants `HTTP-Referer`/`X-Title` for app attribution.
    pub fn openrouter() -> Self {
        Self { attribution: true }
    }

    pub fn openai() -> Self {
        Self { attribution: false }
    }
}

impl ChatFormat for OpenAiFormat {
    fn endpoint(&self, base_url: &str) -> String {
        format!("{}/chat/completions", base_url.trim_end_matches('/'))
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| LlmError::InvalidResponse("API key is not a valid header value".into()))?;
        headers.insert(AUTHORIZATION, bearer);
        if self.attribution {
            headers.insert("http-referer", HeaderValue::from_static(REFERER));
            headers.insert("x-title", HeaderValue::from_static(TITLE));
        }
        Ok(headers)
    }

    fn format_request(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Value {
        json!({
            "model": model,
            "messages": messages,
            "temperature": temperature,
            "max_tokens": max_tokens,
        })
    }

    fn parse_response(&self, body: Value) -> Result<String, LlmError> {
        body.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| {
                LlmError::InvalidResponse(format!("no choices[0].message.content in {}", body))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_slash() {
        let format = OpenAiFormat::openrouter();
        assert_eq!(
            format.endpoint("https://openrouter.ai/api/v1/"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_keeps_system_turn_inline() {
        let format = OpenAiFormat::openai();
        let body = format.format_request(
            "gpt-4o-mini",
            &[ChatMessage::system("be brief"), ChatMessage::user("hi")],
            0.3,
            2000,
        );
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 2000);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be brief");
        assert_eq!(body["messages"][1]["role"], "user");
    }

    #[test]
    fn test_attribution_headers() {
        let headers = OpenAiFormat::openrouter().headers("sk-test").unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer sk-test");
        assert!(headers.contains_key("x-title"));

        let headers = OpenAiFormat::openai().headers("sk-test").unwrap();
        assert!(!headers.contains_key("x-title"));
    }

    #[test]
    fn test_parse_response() {
        let format = OpenAiFormat::openai();
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "feat: add x"}}]
        });
        assert_eq!(format.parse_response(body).unwrap(), "feat: add x");

        let err = format.parse_response(json!({"choices": []})).unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }
}
