use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{AudioUpload, STTError, STTResult, Transcriber};
use crate::core::llm::OPENAI_BASE_URL;

pub const OPENAI_DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

#[derive(Debug, Clone)]
pub struct OpenAITranscriberConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub request_timeout: Duration,
}

impl OpenAITranscriberConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            model: OPENAI_DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            request_timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// OpenAI Whisper transcription client
#[derive(Clone)]
pub struct OpenAITranscriber {
    client: reqwest::Client,
    config: OpenAITranscriberConfig,
}

impl OpenAITranscriber {
    pub fn new(config: OpenAITranscriberConfig) -> STTResult<Self> {
        if config.api_key.is_empty() {
            return Err(STTError::InvalidConfiguration(
                "API key is required for OpenAI transcription".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| STTError::InvalidConfiguration(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Transcriber for OpenAITranscriber {
    async fn transcribe(&self, audio: AudioUpload) -> STTResult<String> {
        let size = audio.data.len();
        let mut part = reqwest::multipart::Part::bytes(audio.data).file_name(audio.file_name);
        if let Some(content_type) = audio.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|e| STTError::Request(format!("Invalid content type: {e}")))?;
        }

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.config.model.clone());

        let url = format!(
            "{}/v1/audio/transcriptions",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| STTError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(STTError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let result: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| STTError::InvalidResponse(format!("Failed to parse transcription: {e}")))?;

        tracing::info!(
            "Transcribed {} bytes of audio into {} chars",
            size,
            result.text.len()
        );
        Ok(result.text)
    }
}
