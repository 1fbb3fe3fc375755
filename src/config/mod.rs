//! Configuration module for the tutorvox server
//!
//! Configuration comes from environment variables (optionally via a `.env` file) or
//! from a YAML file merged with the environment.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//! - `utils`: Utility functions for configuration parsing
//!
//! # Example
//! ```rust,no_run
//! use tutorvox::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//!
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use crate::core::tts::RetryPolicy;

mod env;
mod merge;
mod utils;
mod validation;
mod yaml;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_VOICE_ID: &str = "ZF6FPAbjXT4488VcRRnw";
pub const DEFAULT_TTS_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_TTS_REQUEST_TIMEOUT_SECONDS: u64 = 45;
pub const DEFAULT_TTS_BACKOFF_BASE_MS: u64 = 1000;

/// Server configuration
///
/// Contains everything needed to run the relay:
/// - Server settings (host, port, CORS)
/// - OpenAI settings for chat and transcription
/// - ElevenLabs settings and synthesis retry limits
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,
    /// Allowed browser origin; any origin when unset
    pub cors_allow_origin: Option<String>,
    /// Echoed by the status endpoint
    pub sample_env_var: Option<String>,

    // OpenAI
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_chat_model: String,
    pub openai_transcription_model: String,

    // ElevenLabs
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    pub elevenlabs_model_id: String,
    /// Voices in fallback priority order
    pub elevenlabs_voice_ids: Vec<String>,

    // Synthesis limits
    pub tts_max_attempts: u32,
    pub tts_max_chars: usize,
    pub tts_request_timeout_seconds: u64,
    pub tts_backoff_base_ms: u64,

    /// Cap on the text carried in the explanation response header
    pub header_text_max_chars: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_allow_origin: None,
            sample_env_var: None,
            openai_api_key: None,
            openai_base_url: crate::core::llm::OPENAI_BASE_URL.to_string(),
            openai_chat_model: crate::core::llm::OPENAI_DEFAULT_CHAT_MODEL.to_string(),
            openai_transcription_model: crate::core::stt::OPENAI_DEFAULT_TRANSCRIPTION_MODEL
                .to_string(),
            elevenlabs_api_key: None,
            elevenlabs_base_url: crate::core::tts::ELEVENLABS_BASE_URL.to_string(),
            elevenlabs_model_id: crate::core::tts::elevenlabs::ELEVENLABS_DEFAULT_MODEL
                .to_string(),
            elevenlabs_voice_ids: vec![DEFAULT_VOICE_ID.to_string()],
            tts_max_attempts: DEFAULT_TTS_MAX_ATTEMPTS,
            tts_max_chars: crate::core::tts::DEFAULT_MAX_TTS_CHARS,
            tts_request_timeout_seconds: DEFAULT_TTS_REQUEST_TIMEOUT_SECONDS,
            tts_backoff_base_ms: DEFAULT_TTS_BACKOFF_BASE_MS,
            header_text_max_chars: crate::core::explain::DEFAULT_HEADER_TEXT_MAX_CHARS,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file with environment variable fallbacks
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables
    /// 3. Default values
    ///
    /// The `.env` file is not read here; the YAML file is the source of truth and
    /// only real environment variables fill the gaps.
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Get the server address as a string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn has_elevenlabs(&self) -> bool {
        self.elevenlabs_api_key
            .as_deref()
            .is_some_and(|k| !k.is_empty())
    }

    /// Delays between synthesis attempts, scaled from the configured base unit
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from_unit(Duration::from_millis(self.tts_backoff_base_ms))
    }

    pub fn tts_request_timeout(&self) -> Duration {
        Duration::from_secs(self.tts_request_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_provider_limits() {
        let config = ServerConfig::default();
        assert_eq!(config.address(), "0.0.0.0:3001");
        assert_eq!(config.tts_max_chars, 2500);
        assert_eq!(config.tts_max_attempts, 3);
        assert_eq!(config.tts_request_timeout(), Duration::from_secs(45));
        assert_eq!(config.header_text_max_chars, 8000);
        assert_eq!(config.elevenlabs_voice_ids, vec![DEFAULT_VOICE_ID.to_string()]);
        assert_eq!(config.elevenlabs_model_id, "eleven_flash_v2_5");
        assert_eq!(config.openai_chat_model, "gpt-4o");
    }

    #[test]
    fn test_has_keys_ignores_empty_strings() {
        let config = ServerConfig {
            openai_api_key: Some(String::new()),
            elevenlabs_api_key: Some("el-key".to_string()),
            ..Default::default()
        };
        assert!(!config.has_openai());
        assert!(config.has_elevenlabs());
    }

    #[test]
    fn test_retry_policy_scales_from_base() {
        let config = ServerConfig {
            tts_backoff_base_ms: 10,
            ..Default::default()
        };
        let policy = config.retry_policy();
        assert_eq!(policy.backoff_base, Duration::from_millis(10));
        assert_eq!(policy.retry_delay, Duration::from_millis(10));
        assert_eq!(policy.network_retry_delay, Duration::from_millis(20));
    }
}
