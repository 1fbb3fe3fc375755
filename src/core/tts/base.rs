//! # TTS base types
//!
//! Request/outcome types for speech synthesis and the [`SpeechTransport`] trait that
//! abstracts a single call to a remote synthesis endpoint. The retry engine in
//! [`super::retry`] drives a transport; [`super::elevenlabs`] provides the HTTP one.
//!
//! ```rust,ignore
//! use tutorvox::core::tts::{SynthesisEngine, SynthesisRequest, RetryPolicy};
//!
//! let engine = SynthesisEngine::new(transport, RetryPolicy::default());
//! let request = SynthesisRequest::new("Hello there", vec!["voice-a".into()], 3, 2500)?;
//! match engine.synthesize(&request).await {
//!     SynthesisOutcome::Success(audio) => println!("{} bytes", audio.len()),
//!     SynthesisOutcome::Failure => println!("no audio"),
//! }
//! ```

use async_trait::async_trait;
use std::fmt;

/// Default cap on the number of characters sent to the remote endpoint.
pub const DEFAULT_MAX_TTS_CHARS: usize = 2500;

/// Identifier of a remote voice profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoiceId(String);

impl VoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VoiceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for VoiceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// TTS-specific error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TTSError {
    #[error("Invalid synthesis request: {0}")]
    InvalidRequest(String),

    #[error("Text-to-speech is not configured: {0}")]
    SynthesisUnavailable(String),

    #[error("All voices and attempts exhausted without audio")]
    SynthesisFailed,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for TTS operations
pub type TTSResult<T> = Result<T, TTSError>;

/// A validated synthesis job.
///
/// The text is truncated at construction time, so every transport call sees the
/// capped text.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    text: String,
    voice_candidates: Vec<VoiceId>,
    max_attempts_per_voice: u32,
}

impl SynthesisRequest {
    pub fn new(
        text: &str,
        voice_candidates: Vec<VoiceId>,
        max_attempts_per_voice: u32,
        max_chars: usize,
    ) -> TTSResult<Self> {
        if text.trim().is_empty() {
            return Err(TTSError::InvalidRequest("text cannot be empty".to_string()));
        }
        if voice_candidates.is_empty() {
            return Err(TTSError::InvalidRequest(
                "at least one voice candidate is required".to_string(),
            ));
        }
        if max_attempts_per_voice == 0 {
            return Err(TTSError::InvalidRequest(
                "max attempts per voice must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            text: truncate_chars(text, max_chars).to_string(),
            voice_candidates,
            max_attempts_per_voice,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn voice_candidates(&self) -> &[VoiceId] {
        &self.voice_candidates
    }

    pub fn max_attempts_per_voice(&self) -> u32 {
        self.max_attempts_per_voice
    }
}

/// Result of running the retry engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisOutcome {
    /// Complete, fully buffered audio payload
    Success(Vec<u8>),
    Failure,
}

impl SynthesisOutcome {
    pub fn into_audio(self) -> Option<Vec<u8>> {
        match self {
            SynthesisOutcome::Success(audio) => Some(audio),
            SynthesisOutcome::Failure => None,
        }
    }
}

/// Why a single call to the remote endpoint did not yield audio.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttemptError {
    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Unexpected error: {0}")]
    Other(String),
}

/// One call to a remote synthesis endpoint.
///
/// Implementations must buffer the whole response before returning `Ok`.
#[async_trait]
pub trait SpeechTransport: Send + Sync {
    async fn synthesize_once(&self, voice: &VoiceId, text: &str) -> Result<Vec<u8>, AttemptError>;
}

/// Cut `text` to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("héllo", 10), "héllo");
        assert_eq!(truncate_chars("", 3), "");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_request_truncates_before_dispatch() {
        let long = "a".repeat(3000);
        let request = SynthesisRequest::new(&long, vec!["v".into()], 3, 2500).unwrap();
        assert_eq!(request.text().chars().count(), 2500);
    }

    #[test]
    fn test_request_rejects_empty_text() {
        let result = SynthesisRequest::new("   ", vec!["v".into()], 3, 2500);
        assert!(matches!(result, Err(TTSError::InvalidRequest(_))));
    }

    #[test]
    fn test_request_rejects_no_voices_or_attempts() {
        assert!(SynthesisRequest::new("hi", vec![], 3, 2500).is_err());
        assert!(SynthesisRequest::new("hi", vec!["v".into()], 0, 2500).is_err());
    }

    #[test]
    fn test_outcome_into_audio() {
        assert_eq!(
            SynthesisOutcome::Success(vec![1, 2]).into_audio(),
            Some(vec![1, 2])
        );
        assert_eq!(SynthesisOutcome::Failure.into_audio(), None);
    }
}
