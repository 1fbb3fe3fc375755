use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatCompletion, ChatPrompt, LlmError, LlmResult};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const OPENAI_DEFAULT_CHAT_MODEL: &str = "gpt-4o";

const MAX_ERROR_BODY_LEN: usize = 500;

#[derive(Debug, Clone)]
pub struct OpenAIChatConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub request_timeout: Duration,
}

impl OpenAIChatConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            model: OPENAI_DEFAULT_CHAT_MODEL.to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenAI chat-completions client
#[derive(Clone)]
pub struct OpenAIChat {
    client: reqwest::Client,
    config: OpenAIChatConfig,
}

impl std::fmt::Debug for OpenAIChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIChat")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl OpenAIChat {
    pub fn new(config: OpenAIChatConfig) -> LlmResult<Self> {
        if config.api_key.is_empty() {
            return Err(LlmError::InvalidConfiguration(
                "API key is required for OpenAI".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LlmError::InvalidConfiguration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl ChatCompletion for OpenAIChat {
    async fn complete(&self, prompt: &ChatPrompt) -> LlmResult<String> {
        let body = CompletionRequest {
            model: &self.config.model,
            messages: vec![
                Message {
                    role: "system",
                    content: &prompt.system_prompt,
                },
                Message {
                    role: "user",
                    content: &prompt.user_prompt,
                },
            ],
            max_tokens: prompt.max_output_tokens,
            temperature: prompt.temperature,
        };

        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let mut error_body = response.text().await.unwrap_or_default();
            if error_body.len() > MAX_ERROR_BODY_LEN {
                error_body = crate::core::tts::truncate_chars(&error_body, MAX_ERROR_BODY_LEN)
                    .to_string();
            }
            return Err(LlmError::Api {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse completion: {e}")))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("completion had no content".to_string()))?;

        tracing::info!("Chat completion returned {} chars", text.len());
        Ok(text)
    }
}
