use super::ServerConfig;

/// Validate synthesis limits and the voice list
///
/// The voice list must contain at least one id, and every limit must be at least 1,
/// otherwise no synthesis call could ever be made.
pub fn validate(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.elevenlabs_voice_ids.is_empty() {
        return Err("ELEVENLABS_VOICE_IDS must contain at least one voice id".into());
    }
    if config.tts_max_attempts == 0 {
        return Err("TTS_MAX_ATTEMPTS must be at least 1".into());
    }
    if config.tts_max_chars == 0 {
        return Err("TTS_MAX_CHARS must be at least 1".into());
    }
    if config.tts_request_timeout_seconds == 0 {
        return Err("TTS_REQUEST_TIMEOUT_SECONDS must be at least 1".into());
    }
    if config.header_text_max_chars == 0 {
        return Err("HEADER_TEXT_MAX_CHARS must be at least 1".into());
    }

    Ok(())
}
