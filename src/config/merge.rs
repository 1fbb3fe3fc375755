use std::env;

use super::ServerConfig;
use super::utils::{non_empty, parse_list, parse_number};
use super::yaml::YamlConfig;

/// Merge YAML configuration with environment variables
///
/// Priority order (highest to lowest):
/// 1. YAML configuration values
/// 2. Environment variables
/// 3. Default values
///
/// # Arguments
/// * `yaml_config` - Optional YAML configuration to use as overrides
pub fn merge_config(
    yaml_config: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let yaml = yaml_config.unwrap_or_default();
    let defaults = ServerConfig::default();

    // Value with priority: YAML > ENV > Default
    macro_rules! get_value {
        ($env_var:expr, $yaml_value:expr, $default:expr) => {
            $yaml_value
                .or_else(|| non_empty(env::var($env_var).ok()))
                .unwrap_or($default)
        };
    }

    // Optional value: YAML > ENV
    macro_rules! get_optional {
        ($env_var:expr, $yaml_value:expr) => {
            non_empty($yaml_value).or_else(|| non_empty(env::var($env_var).ok()))
        };
    }

    // Numeric value: YAML > ENV (must parse) > Default
    macro_rules! get_number {
        ($env_var:expr, $yaml_value:expr, $default:expr) => {
            match $yaml_value {
                Some(value) => value,
                None => match non_empty(env::var($env_var).ok()) {
                    Some(raw) => parse_number($env_var, &raw)?,
                    None => $default,
                },
            }
        };
    }

    let server = yaml.server.unwrap_or_default();
    let openai = yaml.openai.unwrap_or_default();
    let elevenlabs = yaml.elevenlabs.unwrap_or_default();
    let tts = yaml.tts.unwrap_or_default();

    let host = get_value!("HOST", server.host, defaults.host);
    let port = get_number!("PORT", server.port, defaults.port);
    let cors_allow_origin = get_optional!("CORS_ALLOW_ORIGIN", server.cors_allow_origin);
    let sample_env_var = non_empty(env::var("SAMPLE_ENV_VAR").ok());

    let openai_api_key = get_optional!("OPENAI_API_KEY", openai.api_key);
    let openai_base_url = get_value!("OPENAI_BASE_URL", openai.base_url, defaults.openai_base_url);
    let openai_chat_model = get_value!(
        "OPENAI_CHAT_MODEL",
        openai.chat_model,
        defaults.openai_chat_model
    );
    let openai_transcription_model = get_value!(
        "OPENAI_TRANSCRIPTION_MODEL",
        openai.transcription_model,
        defaults.openai_transcription_model
    );

    let elevenlabs_api_key = get_optional!("ELEVENLABS_API_KEY", elevenlabs.api_key);
    let elevenlabs_base_url = get_value!(
        "ELEVENLABS_BASE_URL",
        elevenlabs.base_url,
        defaults.elevenlabs_base_url
    );
    let elevenlabs_model_id = get_value!(
        "ELEVENLABS_MODEL_ID",
        elevenlabs.model_id,
        defaults.elevenlabs_model_id
    );
    let elevenlabs_voice_ids = match elevenlabs.voice_ids {
        Some(ids) => ids
            .into_iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect(),
        None => match non_empty(env::var("ELEVENLABS_VOICE_IDS").ok()) {
            Some(raw) => parse_list(&raw),
            None => defaults.elevenlabs_voice_ids,
        },
    };

    let tts_max_attempts = get_number!(
        "TTS_MAX_ATTEMPTS",
        tts.max_attempts,
        defaults.tts_max_attempts
    );
    let tts_max_chars = get_number!("TTS_MAX_CHARS", tts.max_chars, defaults.tts_max_chars);
    let tts_request_timeout_seconds = get_number!(
        "TTS_REQUEST_TIMEOUT_SECONDS",
        tts.request_timeout_seconds,
        defaults.tts_request_timeout_seconds
    );
    let tts_backoff_base_ms = get_number!(
        "TTS_BACKOFF_BASE_MS",
        tts.backoff_base_ms,
        defaults.tts_backoff_base_ms
    );
    let header_text_max_chars = get_number!(
        "HEADER_TEXT_MAX_CHARS",
        tts.header_text_max_chars,
        defaults.header_text_max_chars
    );

    Ok(ServerConfig {
        host,
        port,
        cors_allow_origin,
        sample_env_var,
        openai_api_key,
        openai_base_url,
        openai_chat_model,
        openai_transcription_model,
        elevenlabs_api_key,
        elevenlabs_base_url,
        elevenlabs_model_id,
        elevenlabs_voice_ids,
        tts_max_attempts,
        tts_max_chars,
        tts_request_timeout_seconds,
        tts_backoff_base_ms,
        header_text_max_chars,
    })
}
