use std::sync::Arc;

use tracing::info;

use crate::config::ServerConfig;
use crate::core::explain::Explainer;
use crate::core::llm::{ChatCompletion, OpenAIChat, OpenAIChatConfig};
use crate::core::stt::{OpenAITranscriber, OpenAITranscriberConfig, Transcriber};
use crate::core::tts::{ElevenLabsConfig, ElevenLabsTTS, SpeechSynthesizer, VoiceId};

/// Core-specific shared state for the application.
///
/// Holds the upstream clients built once from configuration. A client is `None`
/// when its credential is missing; handlers report that as "not configured".
#[derive(Clone)]
pub struct CoreState {
    pub transcriber: Option<Arc<dyn Transcriber>>,
    pub speech: Option<SpeechSynthesizer>,
    pub explainer: Option<Explainer>,
}

impl CoreState {
    /// Build the upstream clients from configuration.
    pub fn new(config: &ServerConfig) -> anyhow::Result<Arc<Self>> {
        let speech = match config.elevenlabs_api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(api_key) => {
                let mut tts_config = ElevenLabsConfig::new(api_key);
                tts_config.base_url = config.elevenlabs_base_url.clone();
                tts_config.model_id = config.elevenlabs_model_id.clone();
                tts_config.request_timeout = config.tts_request_timeout();

                let voices: Vec<VoiceId> = config
                    .elevenlabs_voice_ids
                    .iter()
                    .map(|id| VoiceId::new(id.as_str()))
                    .collect();

                info!(
                    "ElevenLabs TTS enabled with {} voice(s), {} attempt(s) each",
                    voices.len(),
                    config.tts_max_attempts
                );
                Some(SpeechSynthesizer::new(
                    Arc::new(ElevenLabsTTS::new(tts_config)?),
                    config.retry_policy(),
                    voices,
                    config.tts_max_attempts,
                    config.tts_max_chars,
                )?)
            }
            None => None,
        };

        let (chat, transcriber): (Option<Arc<dyn ChatCompletion>>, Option<Arc<dyn Transcriber>>) =
            match config.openai_api_key.as_deref().filter(|k| !k.is_empty()) {
                Some(api_key) => {
                    let mut chat_config = OpenAIChatConfig::new(api_key);
                    chat_config.base_url = config.openai_base_url.clone();
                    chat_config.model = config.openai_chat_model.clone();

                    let mut stt_config = OpenAITranscriberConfig::new(api_key);
                    stt_config.base_url = config.openai_base_url.clone();
                    stt_config.model = config.openai_transcription_model.clone();

                    info!("OpenAI chat ({}) and transcription enabled", chat_config.model);
                    (
                        Some(Arc::new(OpenAIChat::new(chat_config)?) as Arc<dyn ChatCompletion>),
                        Some(Arc::new(OpenAITranscriber::new(stt_config)?) as Arc<dyn Transcriber>),
                    )
                }
                None => (None, None),
            };

        Ok(Arc::new(Self::from_parts(
            chat,
            transcriber,
            speech,
            config.header_text_max_chars,
        )))
    }

    /// Assemble state from already-built collaborators.
    pub fn from_parts(
        chat: Option<Arc<dyn ChatCompletion>>,
        transcriber: Option<Arc<dyn Transcriber>>,
        speech: Option<SpeechSynthesizer>,
        header_text_max_chars: usize,
    ) -> Self {
        let explainer =
            chat.map(|chat| Explainer::new(chat, speech.clone(), header_text_max_chars));
        Self {
            transcriber,
            speech,
            explainer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_keys_builds_empty_state() {
        let state = CoreState::new(&ServerConfig::default()).unwrap();
        assert!(state.transcriber.is_none());
        assert!(state.speech.is_none());
        assert!(state.explainer.is_none());
    }

    #[test]
    fn test_keys_build_clients() {
        let config = ServerConfig {
            openai_api_key: Some("sk-test".to_string()),
            elevenlabs_api_key: Some("el-test".to_string()),
            elevenlabs_voice_ids: vec!["a".to_string(), "b".to_string()],
            ..Default::default()
        };
        let state = CoreState::new(&config).unwrap();
        assert!(state.transcriber.is_some());
        assert!(state.explainer.is_some());
        let speech = state.speech.as_ref().unwrap();
        assert_eq!(speech.voices(), &[VoiceId::from("a"), VoiceId::from("b")]);
        assert_eq!(speech.max_chars(), 2500);
    }
}
