mod base;
pub mod elevenlabs;
pub mod retry;

pub use base::{
    AttemptError, DEFAULT_MAX_TTS_CHARS, SpeechTransport, SynthesisOutcome, SynthesisRequest,
    TTSError, TTSResult, VoiceId, truncate_chars,
};
pub use elevenlabs::{ELEVENLABS_BASE_URL, ElevenLabsConfig, ElevenLabsTTS, VoiceSettings};
pub use retry::{RetryPolicy, RetryState, SynthesisEngine, Transition};

use std::sync::Arc;

/// Synthesis engine bound to a fixed voice list and per-request limits.
///
/// Built once at start-up; `speak` turns raw text into a [`SynthesisRequest`]
/// (truncating it) and runs the retry engine.
#[derive(Clone)]
pub struct SpeechSynthesizer {
    engine: SynthesisEngine,
    voices: Vec<VoiceId>,
    max_attempts_per_voice: u32,
    max_chars: usize,
}

impl SpeechSynthesizer {
    pub fn new(
        transport: Arc<dyn SpeechTransport>,
        policy: RetryPolicy,
        voices: Vec<VoiceId>,
        max_attempts_per_voice: u32,
        max_chars: usize,
    ) -> TTSResult<Self> {
        if voices.is_empty() {
            return Err(TTSError::InvalidConfiguration(
                "at least one voice id is required".to_string(),
            ));
        }
        Ok(Self {
            engine: SynthesisEngine::new(transport, policy),
            voices,
            max_attempts_per_voice,
            max_chars,
        })
    }

    pub fn voices(&self) -> &[VoiceId] {
        &self.voices
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Synthesize `text`, returning the complete audio or `SynthesisFailed`.
    pub async fn speak(&self, text: &str) -> TTSResult<Vec<u8>> {
        let request = SynthesisRequest::new(
            text,
            self.voices.clone(),
            self.max_attempts_per_voice,
            self.max_chars,
        )?;
        self.engine
            .synthesize(&request)
            .await
            .into_audio()
            .ok_or(TTSError::SynthesisFailed)
    }
}
