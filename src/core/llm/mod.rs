//! Chat-completion collaborator.
//!
//! The orchestrator only needs "system prompt + user prompt in, text out", so the
//! provider sits behind [`ChatCompletion`]. [`OpenAIChat`] is the production client.

mod openai;

pub use openai::{OPENAI_BASE_URL, OPENAI_DEFAULT_CHAT_MODEL, OpenAIChat, OpenAIChatConfig};

use async_trait::async_trait;

/// Errors from the chat provider
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LlmError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Provider returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type LlmResult<T> = Result<T, LlmError>;

/// One chat-completion call: a fixed persona plus a single user turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, prompt: &ChatPrompt) -> LlmResult<String>;
}
