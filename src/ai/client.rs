use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::debug;

use super::{ChatFormat, ChatMessage, Provider};
use crate::error::LlmError;

/// Requests are abandoned (not retried) after this long.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

const USER_AGENT: &str = concat!("llm-git-commits/", env!("CARGO_PKG_VERSION"));

/// Anything that turns a conversation into a single text reply.
pub trait ChatModel {
    fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String, LlmError>;
}

pub struct LlmClient {
    http: reqwest::blocking::Client,
    format: Box<dyn ChatFormat>,
    base_url: String,
    model: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(
        provider: Provider,
        base_url: &str,
        model: &str,
        api_key: &str,
    ) -> Result<Self, LlmError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            format: provider.format(),
            base_url: base_url.to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn spinner(&self) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Waiting for {}...", self.model));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

impl ChatModel for LlmClient {
    fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String, LlmError> {
        let url = self.format.endpoint(&self.base_url);
        let body = self
            .format
            .format_request(&self.model, messages, temperature, MAX_TOKENS);
        debug!(url = %url, model = %self.model, turns = messages.len(), "calling LLM API");

        let headers = self.format.headers(&self.api_key)?;

        let spinner = self.spinner();
        let result = self.http.post(&url).headers(headers).json(&body).send();
        spinner.finish_and_clear();

        let response = result?;
        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let json: Value = response.json()?;
        let reply = self.format.parse_response(json)?;
        debug!(chars = reply.len(), "LLM reply received");
        Ok(reply)
    }
}
