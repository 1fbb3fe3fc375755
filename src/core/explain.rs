//! Explanation orchestrator: chat text first, then best-effort speech.
//!
//! A chat failure aborts the request. A missing or failing TTS backend only
//! downgrades the response to text.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use super::llm::{ChatCompletion, ChatPrompt, LlmError};
use super::tts::{SpeechSynthesizer, TTSError, truncate_chars};

pub const TUTOR_SYSTEM_PROMPT: &str = "You are an expert, concise, and encouraging AI tutor. \
Provide clear explanations and constructive feedback. Use simple, direct language. \
Keep responses under 400 words for comprehensive yet manageable audio generation.";

pub const EXPLANATION_MAX_TOKENS: u32 = 400;
pub const EXPLANATION_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_HEADER_TEXT_MAX_CHARS: usize = 8000;
pub const TTS_UNAVAILABLE_REASON: &str = "Text-to-speech temporarily unavailable";

/// Body of the explain endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExplanationRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub user_explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExplanationResponse {
    /// Audio plus the (header-length capped) cleaned text it was made from
    AudioWithText { audio: Vec<u8>, text: String },
    /// Raw chat text and why there is no audio
    TextOnly { text: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExplainError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("AI Error: {0}")]
    UpstreamTextGeneration(#[from] LlmError),
}

/// Build the single user turn for a topic, with or without the learner's attempt.
pub fn build_user_prompt(topic: &str, user_explanation: Option<&str>) -> String {
    match user_explanation.filter(|e| !e.is_empty()) {
        Some(explanation) => format!(
            "The topic is: '{topic}'. The user's explanation is: '{explanation}'. \
Please provide constructive feedback on their explanation, pointing out strengths and areas for improvement."
        ),
        None => format!("Explain the following topic concisely and clearly in under 200 words: '{topic}'."),
    }
}

/// Flatten line breaks so the text reads naturally when spoken.
pub fn clean_for_speech(text: &str) -> String {
    text.replace(['\n', '\r'], " ").trim().to_string()
}

#[derive(Clone)]
pub struct Explainer {
    chat: Arc<dyn ChatCompletion>,
    speech: Option<SpeechSynthesizer>,
    header_text_max_chars: usize,
}

impl Explainer {
    pub fn new(
        chat: Arc<dyn ChatCompletion>,
        speech: Option<SpeechSynthesizer>,
        header_text_max_chars: usize,
    ) -> Self {
        Self {
            chat,
            speech,
            header_text_max_chars,
        }
    }

    pub async fn explain(
        &self,
        request: &ExplanationRequest,
    ) -> Result<ExplanationResponse, ExplainError> {
        let topic = request
            .topic
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ExplainError::InvalidRequest("Topic is required.".to_string()))?;

        let prompt = ChatPrompt {
            system_prompt: TUTOR_SYSTEM_PROMPT.to_string(),
            user_prompt: build_user_prompt(topic, request.user_explanation.as_deref()),
            max_output_tokens: EXPLANATION_MAX_TOKENS,
            temperature: EXPLANATION_TEMPERATURE,
        };

        let ai_text = self.chat.complete(&prompt).await?;
        let cleaned_text = clean_for_speech(&ai_text);

        match self.synthesize(&cleaned_text).await {
            Ok(audio) => {
                info!("Explanation audio ready: {} bytes", audio.len());
                Ok(ExplanationResponse::AudioWithText {
                    audio,
                    text: truncate_chars(&cleaned_text, self.header_text_max_chars).to_string(),
                })
            }
            Err(e) => {
                warn!("TTS failed, returning text only: {}", e);
                Ok(ExplanationResponse::TextOnly {
                    text: ai_text,
                    reason: TTS_UNAVAILABLE_REASON.to_string(),
                })
            }
        }
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TTSError> {
        let speech = self.speech.as_ref().ok_or_else(|| {
            TTSError::SynthesisUnavailable("no ElevenLabs API key configured".to_string())
        })?;
        info!("Generating audio for {} chars of text", text.chars().count());
        speech.speak(text).await
    }
}
