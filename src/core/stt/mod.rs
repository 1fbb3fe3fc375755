mod openai;

pub use openai::{OPENAI_DEFAULT_TRANSCRIPTION_MODEL, OpenAITranscriber, OpenAITranscriberConfig};

use async_trait::async_trait;

/// Error types for STT operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum STTError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Provider returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type STTResult<T> = Result<T, STTError>;

/// An uploaded recording to transcribe
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Speech-to-text collaborator used by the transcribe endpoint.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: AudioUpload) -> STTResult<String>;
}
