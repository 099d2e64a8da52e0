mod anthropic;
mod client;
mod openai;
mod provider;

pub use anthropic::AnthropicFormat;
pub use client::{ChatModel, LlmClient, DEFAULT_TEMPERATURE, MAX_TOKENS, REQUEST_TIMEOUT};
pub use openai::OpenAiFormat;
pub use provider::{strip_code_blocks, ChatFormat, ChatMessage, Provider, Role};
