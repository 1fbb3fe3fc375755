use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::base::{AttemptError, SpeechTransport, TTSError, TTSResult, VoiceId};

pub const ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";
pub const ELEVENLABS_DEFAULT_MODEL: &str = "eleven_flash_v2_5";
pub const ELEVENLABS_REQUEST_TIMEOUT_SECS: u64 = 45;

/// Cap on error bodies kept for logging
const MAX_ERROR_BODY_LEN: usize = 500;

/// Voice settings for ElevenLabs TTS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Voice stability (0.0 to 1.0)
    pub stability: f32,
    /// Similarity boost (0.0 to 1.0)
    pub similarity_boost: f32,
    /// Style strength (0.0 to 1.0)
    pub style: f32,
    /// Use speaker boost
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.5,
            style: 0.0,
            use_speaker_boost: true,
        }
    }
}

/// JSON body of a text-to-speech call
#[derive(Debug, Serialize)]
struct SpeechRequestBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: &'a VoiceSettings,
}

/// Settings for the ElevenLabs HTTP transport
#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    pub api_key: String,
    /// Scheme and host, without the `/v1/...` path
    pub base_url: String,
    pub model_id: String,
    pub voice_settings: VoiceSettings,
    pub request_timeout: Duration,
}

impl ElevenLabsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: ELEVENLABS_BASE_URL.to_string(),
            model_id: ELEVENLABS_DEFAULT_MODEL.to_string(),
            voice_settings: VoiceSettings::default(),
            request_timeout: Duration::from_secs(ELEVENLABS_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// ElevenLabs text-to-speech over the REST API
#[derive(Clone)]
pub struct ElevenLabsTTS {
    client: reqwest::Client,
    config: ElevenLabsConfig,
}

impl std::fmt::Debug for ElevenLabsTTS {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevenLabsTTS")
            .field("base_url", &self.config.base_url)
            .field("model_id", &self.config.model_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl ElevenLabsTTS {
    pub fn new(config: ElevenLabsConfig) -> TTSResult<Self> {
        if config.api_key.is_empty() {
            return Err(TTSError::InvalidConfiguration(
                "API key is required for ElevenLabs".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| {
                TTSError::InvalidConfiguration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    fn speech_url(&self, voice: &VoiceId) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.config.base_url.trim_end_matches('/'),
            voice
        )
    }
}

fn classify_reqwest_error(error: reqwest::Error) -> AttemptError {
    if error.is_timeout() {
        AttemptError::Timeout(error.to_string())
    } else if error.is_connect() {
        AttemptError::Connection(error.to_string())
    } else {
        AttemptError::Other(error.to_string())
    }
}

#[async_trait]
impl SpeechTransport for ElevenLabsTTS {
    async fn synthesize_once(&self, voice: &VoiceId, text: &str) -> Result<Vec<u8>, AttemptError> {
        let body = SpeechRequestBody {
            text,
            model_id: &self.config.model_id,
            voice_settings: &self.config.voice_settings,
        };

        let response = self
            .client
            .post(self.speech_url(voice))
            .header("xi-api-key", &self.config.api_key)
            .header("Accept", "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        tracing::info!("TTS Response status: {}", status.as_u16());

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AttemptError::RateLimited);
        }

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            let body = if error_body.len() > MAX_ERROR_BODY_LEN {
                let cut = super::base::truncate_chars(&error_body, MAX_ERROR_BODY_LEN);
                format!("{cut}... (truncated)")
            } else {
                error_body
            };
            return Err(AttemptError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // Buffer the whole stream; a cut-off stream counts as a failed attempt
        let mut audio = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(classify_reqwest_error)?;
            audio.extend_from_slice(&chunk);
        }

        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(server: &MockServer) -> ElevenLabsTTS {
        let mut config = ElevenLabsConfig::new("test-key");
        config.base_url = server.uri();
        config.request_timeout = Duration::from_secs(5);
        ElevenLabsTTS::new(config).unwrap()
    }

    #[test]
    fn test_new_requires_api_key() {
        let result = ElevenLabsTTS::new(ElevenLabsConfig::new(""));
        assert!(matches!(result, Err(TTSError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_default_voice_settings_serialize() {
        let json = serde_json::to_value(VoiceSettings::default()).unwrap();
        assert_eq!(json["stability"], 0.5);
        assert_eq!(json["similarity_boost"], 0.5);
        assert_eq!(json["style"], 0.0);
        assert_eq!(json["use_speaker_boost"], true);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let tts = ElevenLabsTTS::new(ElevenLabsConfig::new("secret-key")).unwrap();
        let debug = format!("{tts:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_success_returns_full_body() {
        let server = MockServer::start().await;
        let audio = vec![0xFFu8, 0xFB, 0x90, 0x64, 0x00, 0x01];

        Mock::given(method("POST"))
            .and(path("/v1/text-to-speech/voice-a"))
            .and(header("xi-api-key", "test-key"))
            .and(header("accept", "audio/mpeg"))
            .and(body_partial_json(serde_json::json!({
                "text": "Hello",
                "model_id": "eleven_flash_v2_5",
                "voice_settings": {"use_speaker_boost": true}
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "audio/mpeg")
                    .set_body_bytes(audio.clone()),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = transport(&server)
            .synthesize_once(&VoiceId::from("voice-a"), "Hello")
            .await;
        assert_eq!(result.unwrap(), audio);
    }

    #[tokio::test]
    async fn test_429_is_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let result = transport(&server)
            .synthesize_once(&VoiceId::from("voice-a"), "Hello")
            .await;
        assert_eq!(result, Err(AttemptError::RateLimited));
    }

    #[tokio::test]
    async fn test_other_status_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"detail":{"status":"invalid_api_key"}}"#),
            )
            .mount(&server)
            .await;

        let result = transport(&server)
            .synthesize_once(&VoiceId::from("voice-a"), "Hello")
            .await;
        match result {
            Err(AttemptError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("invalid_api_key"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_response_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let mut config = ElevenLabsConfig::new("test-key");
        config.base_url = server.uri();
        config.request_timeout = Duration::from_millis(50);
        let tts = ElevenLabsTTS::new(config).unwrap();

        let result = tts.synthesize_once(&VoiceId::from("v"), "Hello").await;
        assert!(matches!(result, Err(AttemptError::Timeout(_))), "{result:?}");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        let mut config = ElevenLabsConfig::new("test-key");
        // Port 9 (discard) on localhost is expected to refuse connections
        config.base_url = "http://127.0.0.1:9".to_string();
        config.request_timeout = Duration::from_secs(2);
        let tts = ElevenLabsTTS::new(config).unwrap();

        let result = tts.synthesize_once(&VoiceId::from("v"), "Hello").await;
        assert!(matches!(result, Err(AttemptError::Connection(_))), "{result:?}");
    }
}
