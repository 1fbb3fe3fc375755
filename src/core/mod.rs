pub mod explain;
pub mod header_codec;
pub mod llm;
pub mod state;
pub mod stt;
pub mod tts;

// Re-export commonly used types for convenience
pub use explain::{ExplainError, ExplanationRequest, ExplanationResponse, Explainer};
pub use header_codec::{BASE64_MARKER, CodecError, EncodedHeaderValue};
pub use llm::{ChatCompletion, ChatPrompt, LlmError, OpenAIChat};
pub use stt::{AudioUpload, OpenAITranscriber, STTError, Transcriber};
pub use tts::{
    AttemptError, ElevenLabsTTS, RetryPolicy, SpeechSynthesizer, SpeechTransport,
    SynthesisEngine, SynthesisOutcome, SynthesisRequest, TTSError, VoiceId,
};

pub use state::CoreState;
