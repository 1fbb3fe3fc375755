use super::ServerConfig;
use super::merge::merge_config;
use super::validation::validate;

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Reads configuration from environment variables, with sensible defaults.
    /// Also loads from .env file if present using dotenvy.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Numeric environment variables are malformed
    /// - Synthesis limits or the voice list are invalid
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let config = merge_config(None)?;
        validate(&config)?;

        if !config.has_openai() {
            tracing::warn!("OPENAI_API_KEY not set; chat and transcription are disabled");
        }
        if !config.has_elevenlabs() {
            tracing::warn!("ELEVENLABS_API_KEY not set; text-to-speech is disabled");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn cleanup_env_vars() {
        unsafe {
            env::remove_var("HOST");
            env::remove_var("PORT");
            env::remove_var("ELEVENLABS_VOICE_IDS");
            env::remove_var("TTS_MAX_ATTEMPTS");
            env::remove_var("TTS_BACKOFF_BASE_MS");
            env::remove_var("SAMPLE_ENV_VAR");
        }
    }

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        cleanup_env_vars();
        unsafe {
            env::set_var("HOST", "127.0.0.1");
            env::set_var("PORT", "8081");
            env::set_var("TTS_BACKOFF_BASE_MS", "250");
            env::set_var("SAMPLE_ENV_VAR", "hello");
        }

        let config = ServerConfig::from_env().expect("Should load config");
        assert_eq!(config.address(), "127.0.0.1:8081");
        assert_eq!(config.tts_backoff_base_ms, 250);
        assert_eq!(config.sample_env_var.as_deref(), Some("hello"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_zero_attempts() {
        cleanup_env_vars();
        unsafe {
            env::set_var("TTS_MAX_ATTEMPTS", "0");
        }

        let result = ServerConfig::from_env();
        assert!(result.unwrap_err().to_string().contains("TTS_MAX_ATTEMPTS"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_blank_voice_list() {
        cleanup_env_vars();
        unsafe {
            env::set_var("ELEVENLABS_VOICE_IDS", " , ");
        }

        let result = ServerConfig::from_env();
        assert!(result.is_err());

        cleanup_env_vars();
    }
}
