use axum::{
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::core::tts::{SpeechSynthesizer, TTSError};
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

pub const TTS_SELF_TEST_TEXT: &str = "Hello, this is a test of the text to speech system.";

/// Request body for the text-to-speech endpoint
#[derive(Debug, Default, Deserialize)]
pub struct SpeakRequest {
    /// The text to synthesize
    #[serde(default)]
    pub text: Option<String>,
}

fn speech(state: &AppState) -> AppResult<&SpeechSynthesizer> {
    state
        .core_state
        .speech
        .as_ref()
        .ok_or_else(|| AppError::NotConfigured("Eleven Labs API key is not set.".to_string()))
}

fn audio_response(audio: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg")),
            (header::CONTENT_LENGTH, HeaderValue::from(audio.len())),
        ],
        audio,
    )
        .into_response()
}

/// Handler for the /api/text-to-speech endpoint
pub async fn speak_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SpeakRequest>, JsonRejection>,
) -> AppResult<Response> {
    let speech = speech(&state)?;

    let text = payload
        .ok()
        .and_then(|Json(request)| request.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("No text provided for TTS.".to_string()))?;

    info!("Speak request received - text length: {}", text.len());

    match speech.speak(&text).await {
        Ok(audio) => {
            info!("TTS synthesis successful - {} bytes", audio.len());
            Ok(audio_response(audio))
        }
        Err(TTSError::InvalidRequest(msg)) => Err(AppError::BadRequest(msg)),
        Err(e) => {
            error!("TTS synthesis failed: {}", e);
            Err(AppError::ServiceUnavailable(
                "TTS service temporarily unavailable".to_string(),
            ))
        }
    }
}

/// Handler for the /api/test-tts endpoint
///
/// Runs a fixed sentence through the full retry engine.
pub async fn test_tts_handler(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let speech = speech(&state)?;

    let response = match speech.speak(TTS_SELF_TEST_TEXT).await {
        Ok(_) => Json(json!({
            "status": "success",
            "message": "TTS is working"
        }))
        .into_response(),
        Err(e) => {
            error!("TTS self-test failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "failed",
                    "message": "TTS is not working"
                })),
            )
                .into_response()
        }
    };

    Ok(response)
}
